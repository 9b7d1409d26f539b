//! API client configuration.

/// Environment variable naming the blog server base URL.
pub const API_URL_ENV: &str = "COMPOSITION_API_URL";

/// Default base URL when the environment leaves it unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Configuration for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are joined onto, without a trailing
    /// slash.
    pub base_url: String,
}

impl ApiConfig {
    /// Build a config with an explicit base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Build a config from `COMPOSITION_API_URL`, falling back to
    /// `http://localhost:8080`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slashes() {
        let config = ApiConfig::new("http://blog.example.com/");
        assert_eq!(config.base_url, "http://blog.example.com");
    }

    #[test]
    fn default_points_at_localhost() {
        assert_eq!(ApiConfig::default().base_url, DEFAULT_API_URL);
    }
}
