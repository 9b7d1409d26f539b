//! Blog server client.
//!
//! [`BlogApi`] is the seam between reducers and the network: feature
//! environments are generic over it, production wires in [`HttpApi`],
//! tests wire in [`crate::mocks::MockApi`].

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{
    Article, ArticlePage, ArticlePreview, CreatedArticle, ErrorBody, NewArticleRequest,
    SigninRequest, SignupRequest, TokenResponse,
};
use serde::de::DeserializeOwned;

/// Client for the blog server endpoints.
///
/// Every method performs exactly one HTTP request and resolves to either
/// the decoded success body or an [`ApiError`]. No retries, no caching.
pub trait BlogApi: Send + Sync {
    /// `POST /api/signin`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] with the server's message on bad credentials
    /// - [`ApiError::Transport`] if no usable response was obtained
    fn signin(
        &self,
        request: &SigninRequest,
    ) -> impl std::future::Future<Output = Result<TokenResponse, ApiError>> + Send;

    /// `POST /api/signup`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`BlogApi::signin`].
    fn signup(
        &self,
        request: &SignupRequest,
    ) -> impl std::future::Future<Output = Result<TokenResponse, ApiError>> + Send;

    /// `GET /api/articles?page=N`.
    ///
    /// Returns the page's previews in server order; an exact page-size
    /// count suggests further pages may exist.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] with the server's message
    /// - [`ApiError::Transport`] if no usable response was obtained
    fn article_previews(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ArticlePreview>, ApiError>> + Send;

    /// `GET /api/articles/:id`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] with the server's message (e.g. not found)
    /// - [`ApiError::Transport`] if no usable response was obtained
    fn article(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Article, ApiError>> + Send;

    /// `POST /api/articles` with `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] with the server's message (e.g. unauthorized)
    /// - [`ApiError::Transport`] if no usable response was obtained
    fn create_article(
        &self,
        token: &str,
        request: &NewArticleRequest,
    ) -> impl std::future::Future<Output = Result<CreatedArticle, ApiError>> + Send;
}

/// Production [`BlogApi`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the given configuration.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decode a settled response into the success body or an [`ApiError`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Transport(format!("invalid response body: {e}")))
        } else {
            let body: ErrorBody = response
                .json()
                .await
                .map_err(|e| ApiError::Transport(format!("invalid error body: {e}")))?;
            Err(ApiError::Api {
                status: status.as_u16(),
                message: body.message,
            })
        }
    }
}

fn transport(error: reqwest::Error) -> ApiError {
    ApiError::Transport(error.to_string())
}

impl BlogApi for HttpApi {
    async fn signin(&self, request: &SigninRequest) -> Result<TokenResponse, ApiError> {
        tracing::debug!(username = %request.username, "POST /api/signin");
        let response = self
            .client
            .post(self.endpoint("/api/signin"))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<TokenResponse, ApiError> {
        tracing::debug!(username = %request.username, "POST /api/signup");
        let response = self
            .client
            .post(self.endpoint("/api/signup"))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn article_previews(&self, page: u32) -> Result<Vec<ArticlePreview>, ApiError> {
        tracing::debug!(page, "GET /api/articles");
        let response = self
            .client
            .get(self.endpoint("/api/articles"))
            .query(&[("page", page)])
            .send()
            .await
            .map_err(transport)?;
        let page: ArticlePage = Self::decode(response).await?;
        Ok(page.article_previews)
    }

    async fn article(&self, id: i64) -> Result<Article, ApiError> {
        tracing::debug!(id, "GET /api/articles/:id");
        let response = self
            .client
            .get(self.endpoint(&format!("/api/articles/{id}")))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn create_article(
        &self,
        token: &str,
        request: &NewArticleRequest,
    ) -> Result<CreatedArticle, ApiError> {
        tracing::debug!(title = %request.title, "POST /api/articles");
        let response = self
            .client
            .post(self.endpoint("/api/articles"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }
}
