//! # Composition API
//!
//! HTTP client and wire types for the blog server contract.
//!
//! The server is an external collaborator; this crate pins down the five
//! endpoints the client consumes and maps every outcome into a closed
//! [`ApiError`] taxonomy:
//!
//! | Method | Path | Success body | Failure body |
//! |---|---|---|---|
//! | POST | `/api/signin` | `{token}` | `{message}` |
//! | POST | `/api/signup` | `{token}` | `{message}` |
//! | GET | `/api/articles?page=N` | `{article_previews: [...]}` | `{message}` |
//! | GET | `/api/articles/:id` | article | `{message}` |
//! | POST | `/api/articles` (bearer auth) | created article | `{message}` |
//!
//! Feature crates depend on the [`BlogApi`] trait, never on the concrete
//! [`HttpApi`], so reducer effects can be exercised against [`mocks::MockApi`]
//! at memory speed.

pub mod client;
pub mod config;
pub mod error;
pub mod mocks;
pub mod types;

pub use client::{BlogApi, HttpApi};
pub use config::ApiConfig;
pub use error::ApiError;
pub use types::{
    Article, ArticlePage, ArticlePreview, CreatedArticle, NewArticleRequest, SigninRequest,
    SignupRequest, TokenResponse,
};
