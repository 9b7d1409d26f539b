//! Session state.

use crate::token::decode_claims;
use serde::{Deserialize, Serialize};

/// Client-side session record.
///
/// Invariant: `is_logged_in` implies `token` is non-empty. `username` is
/// always derived by decoding the token payload, never supplied
/// independently.
///
/// The default value is the logged-out session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// A sign-in or sign-up request is in flight.
    pub is_fetching: bool,

    /// The user is authenticated.
    pub is_logged_in: bool,

    /// Bearer token, empty when logged out.
    pub token: String,

    /// Username decoded from the token payload, for display.
    pub username: String,
}

impl SessionState {
    /// The logged-out session.
    #[must_use]
    pub fn logged_out() -> Self {
        Self::default()
    }

    /// Rebuild a session from a persisted token.
    ///
    /// This is the process-start path: whatever token (possibly none) is
    /// found in the token store seeds the session. A token that fails to
    /// decode falls back to the logged-out default rather than aborting
    /// the bootstrap.
    #[must_use]
    pub fn from_persisted_token(token: Option<&str>) -> Self {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Self::logged_out();
        };

        match decode_claims(token) {
            Ok(claims) => Self {
                is_fetching: false,
                is_logged_in: true,
                token: token.to_string(),
                username: claims.username,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Persisted token failed to decode, starting logged out");
                Self::logged_out()
            },
        }
    }
}
