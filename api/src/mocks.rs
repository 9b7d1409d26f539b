//! Mock blog server for tests.
//!
//! [`MockApi`] resolves requests from stubbed results at memory speed.
//! Responses can also be *gated*: a gated page request does not settle
//! until the test releases it, which is how the stale-response discard
//! rule is exercised deterministically.

#![allow(clippy::unwrap_used)] // Test support code

use crate::error::ApiError;
use crate::types::{
    Article, ArticlePreview, CreatedArticle, NewArticleRequest, SigninRequest, SignupRequest,
    TokenResponse,
};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

type Stub<T> = Result<T, ApiError>;

#[derive(Default)]
struct MockInner {
    signin: Mutex<Option<Stub<TokenResponse>>>,
    signup: Mutex<Option<Stub<TokenResponse>>>,
    previews: Mutex<HashMap<u32, Stub<Vec<ArticlePreview>>>>,
    preview_gates: Mutex<HashMap<u32, Arc<Notify>>>,
    articles: Mutex<HashMap<i64, Stub<Article>>>,
    create: Mutex<Option<Stub<CreatedArticle>>>,
    bearer_tokens: Mutex<Vec<String>>,
}

/// Handle to a gated page response; the request settles once
/// [`Gate::release`] is called.
#[derive(Clone)]
pub struct Gate {
    notify: Arc<Notify>,
}

impl Gate {
    /// Let the gated request settle. A release before the request
    /// arrives is remembered.
    pub fn release(&self) {
        self.notify.notify_one();
    }
}

/// In-memory [`crate::BlogApi`] with stubbed responses.
#[derive(Clone, Default)]
pub struct MockApi {
    inner: Arc<MockInner>,
}

impl MockApi {
    /// Create a mock with no stubs; every request fails as transport
    /// errors until stubbed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub the next (and all subsequent) sign-in responses.
    pub fn stub_signin(&self, result: Stub<TokenResponse>) {
        *lock(&self.inner.signin) = Some(result);
    }

    /// Stub the next (and all subsequent) sign-up responses.
    pub fn stub_signup(&self, result: Stub<TokenResponse>) {
        *lock(&self.inner.signup) = Some(result);
    }

    /// Stub the preview listing for one page.
    pub fn stub_previews(&self, page: u32, result: Stub<Vec<ArticlePreview>>) {
        lock(&self.inner.previews).insert(page, result);
    }

    /// Gate the preview listing for one page; the returned [`Gate`]
    /// releases it.
    #[must_use]
    pub fn gate_previews(&self, page: u32) -> Gate {
        let notify = Arc::new(Notify::new());
        lock(&self.inner.preview_gates).insert(page, Arc::clone(&notify));
        Gate { notify }
    }

    /// Stub one article by id.
    pub fn stub_article(&self, id: i64, result: Stub<Article>) {
        lock(&self.inner.articles).insert(id, result);
    }

    /// Stub the create-article response.
    pub fn stub_create_article(&self, result: Stub<CreatedArticle>) {
        *lock(&self.inner.create) = Some(result);
    }

    /// Bearer tokens seen on `create_article` calls, in order.
    #[must_use]
    pub fn seen_bearer_tokens(&self) -> Vec<String> {
        lock(&self.inner.bearer_tokens).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn missing(what: &str) -> ApiError {
    ApiError::Transport(format!("no stub for {what}"))
}

impl crate::BlogApi for MockApi {
    async fn signin(&self, _request: &SigninRequest) -> Result<TokenResponse, ApiError> {
        lock(&self.inner.signin)
            .clone()
            .unwrap_or_else(|| Err(missing("signin")))
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<TokenResponse, ApiError> {
        lock(&self.inner.signup)
            .clone()
            .unwrap_or_else(|| Err(missing("signup")))
    }

    async fn article_previews(&self, page: u32) -> Result<Vec<ArticlePreview>, ApiError> {
        // Clone the gate out before awaiting so the lock is not held
        // across the await point.
        let gate = lock(&self.inner.preview_gates).get(&page).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        lock(&self.inner.previews)
            .get(&page)
            .cloned()
            .unwrap_or_else(|| Err(missing(&format!("articles page {page}"))))
    }

    async fn article(&self, id: i64) -> Result<Article, ApiError> {
        lock(&self.inner.articles)
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(missing(&format!("article {id}"))))
    }

    async fn create_article(
        &self,
        token: &str,
        _request: &NewArticleRequest,
    ) -> Result<CreatedArticle, ApiError> {
        lock(&self.inner.bearer_tokens).push(token.to_string());
        lock(&self.inner.create)
            .clone()
            .unwrap_or_else(|| Err(missing("create article")))
    }
}

/// Build `count` distinct previews for listing tests.
#[must_use]
pub fn sample_previews(count: usize) -> Vec<ArticlePreview> {
    (0..count)
        .map(|i| ArticlePreview {
            id: i64::try_from(i).unwrap() + 1,
            title: format!("Article {}", i + 1),
            username: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        })
        .collect()
}
