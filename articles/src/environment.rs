//! Articles environment.

use composition_api::BlogApi;

/// Dependencies injected into the article reducers.
#[derive(Debug, Clone)]
pub struct ArticlesEnvironment<A>
where
    A: BlogApi + Clone,
{
    /// Blog server client.
    pub api: A,
}

impl<A> ArticlesEnvironment<A>
where
    A: BlogApi + Clone,
{
    /// Create a new articles environment.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }
}
