//! Wire types for the blog server contract.
//!
//! Field names follow the server's JSON exactly (`article_id`,
//! `password_confirm`, `article_previews`), so these types double as the
//! contract documentation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One article preview in the paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePreview {
    /// Article identifier.
    #[serde(rename = "article_id")]
    pub id: i64,

    /// Article title.
    pub title: String,

    /// Author username.
    pub username: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One page of article previews (`GET /api/articles?page=N`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePage {
    /// Previews in server order, at most one page-size worth.
    pub article_previews: Vec<ArticlePreview>,
}

/// A full article (`GET /api/articles/:id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article identifier.
    #[serde(rename = "article_id")]
    pub id: i64,

    /// Article title.
    pub title: String,

    /// Article body text; paragraphs separated by newlines.
    pub body: String,

    /// Author username.
    pub username: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Sign-in request body (`POST /api/signin`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninRequest {
    /// Account username.
    pub username: String,

    /// Account password.
    pub password: String,
}

/// Sign-up request body (`POST /api/signup`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Desired username.
    pub username: String,

    /// Account email.
    pub email: String,

    /// Password.
    pub password: String,

    /// Password confirmation; the server validates equality.
    pub password_confirm: String,
}

/// Successful sign-in/sign-up response: a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Compact JWS bearer token.
    pub token: String,
}

/// New article request body (`POST /api/articles`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticleRequest {
    /// Article title.
    pub title: String,

    /// Article body.
    pub body: String,
}

/// Created article response (`POST /api/articles`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedArticle {
    /// Identifier assigned by the server.
    #[serde(rename = "article_id")]
    pub id: i64,

    /// Echoed title.
    pub title: String,

    /// Echoed body.
    pub body: String,
}

/// Error body every failing endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message to surface inline in the UI.
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn article_preview_uses_server_field_names() {
        let json = r#"{
            "article_id": 7,
            "title": "Hello",
            "username": "alice",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;

        let preview: ArticlePreview = serde_json::from_str(json).unwrap();
        assert_eq!(preview.id, 7);
        assert_eq!(preview.username, "alice");

        let round = serde_json::to_value(&preview).unwrap();
        assert!(round.get("article_id").is_some());
        assert!(round.get("id").is_none());
    }

    #[test]
    fn article_page_decodes_preview_list() {
        let json = r#"{"article_previews": []}"#;
        let page: ArticlePage = serde_json::from_str(json).unwrap();
        assert!(page.article_previews.is_empty());
    }

    #[test]
    fn signup_request_includes_password_confirm() {
        let req = SignupRequest {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "p".into(),
            password_confirm: "p".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["password_confirm"], "p");
    }
}
