//! Single-article and composition flows driven through the store.

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use composition_api::mocks::MockApi;
use composition_api::{Article, CreatedArticle};
use composition_articles::compose::SUBMIT_SUCCESS_MESSAGE;
use composition_articles::{
    ArticleAction, ArticleReducer, ArticleViewState, ArticlesEnvironment, ComposeAction,
    ComposeReducer, ComposeState,
};
use composition_runtime::Store;

fn sample_article() -> Article {
    Article {
        id: 7,
        title: "Hello".into(),
        body: "Body text".into(),
        username: "alice".into(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn opening_an_article_loads_it() {
    let api = MockApi::new();
    api.stub_article(7, Ok(sample_article()));

    let store = Store::new(
        ArticleViewState::default(),
        ArticleReducer::new(),
        ArticlesEnvironment::new(api),
    );

    let mut fetch = store.send(ArticleAction::Opened { id: 7 }).await.unwrap();
    fetch.wait().await;

    let state = store.state(Clone::clone).await;
    assert_eq!(state.article.map(|a| a.title), Some("Hello".to_string()));
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn opening_a_missing_article_surfaces_the_message() {
    let api = MockApi::new();
    api.stub_article(
        9,
        Err(composition_api::ApiError::Api {
            status: 404,
            message: "article not found".into(),
        }),
    );

    let store = Store::new(
        ArticleViewState::default(),
        ArticleReducer::new(),
        ArticlesEnvironment::new(api),
    );

    let mut fetch = store.send(ArticleAction::Opened { id: 9 }).await.unwrap();
    fetch.wait().await;

    let state = store.state(Clone::clone).await;
    assert_eq!(state.article, None);
    assert_eq!(state.error.as_deref(), Some("article not found"));
}

#[tokio::test]
async fn submitting_an_article_sends_the_bearer_token() {
    let api = MockApi::new();
    api.stub_create_article(Ok(CreatedArticle {
        id: 1,
        title: "Hello".into(),
        body: "Body".into(),
    }));

    let store = Store::new(
        ComposeState::default(),
        ComposeReducer::new(),
        ArticlesEnvironment::new(api.clone()),
    );

    let mut submit = store
        .send(ComposeAction::Submitted {
            title: "Hello".into(),
            body: "Body".into(),
            token: "bearer-token".into(),
        })
        .await
        .unwrap();
    submit.wait().await;

    let state = store.state(Clone::clone).await;
    assert_eq!(state.success.as_deref(), Some(SUBMIT_SUCCESS_MESSAGE));
    assert_eq!(state.error, None);
    assert_eq!(api.seen_bearer_tokens(), vec!["bearer-token".to_string()]);
}

#[tokio::test]
async fn rejected_submission_surfaces_the_message() {
    let api = MockApi::new();
    api.stub_create_article(Err(composition_api::ApiError::Api {
        status: 422,
        message: "title required".into(),
    }));

    let store = Store::new(
        ComposeState::default(),
        ComposeReducer::new(),
        ArticlesEnvironment::new(api),
    );

    let mut submit = store
        .send(ComposeAction::Submitted {
            title: String::new(),
            body: "Body".into(),
            token: "bearer-token".into(),
        })
        .await
        .unwrap();
    submit.wait().await;

    let state = store.state(Clone::clone).await;
    assert_eq!(state.success, None);
    assert_eq!(state.error.as_deref(), Some("title required"));
}
