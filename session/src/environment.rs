//! Session environment.

use composition_api::BlogApi;

/// Dependencies injected into the session reducer.
///
/// Generic over the API client so tests can wire in a mock. The client
/// must be `Clone` because request effects move a handle into a spawned
/// future.
#[derive(Debug, Clone)]
pub struct SessionEnvironment<A>
where
    A: BlogApi + Clone,
{
    /// Blog server client.
    pub api: A,
}

impl<A> SessionEnvironment<A>
where
    A: BlogApi + Clone,
{
    /// Create a new session environment.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }
}
