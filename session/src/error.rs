//! Session errors.

use composition_runtime::StoreError;
use thiserror::Error;

use crate::token_store::TokenStoreError;

/// Error surfaced by the session flows.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server answered and rejected the request.
    #[error("{0}")]
    Rejected(String),

    /// The request never produced a server response.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The store refused or lost the action.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading or writing the persisted token failed.
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

impl SessionError {
    /// `true` when the server answered with a rejection, as opposed to
    /// being unreachable or a local failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
