//! Session actions.
//!
//! The closed set of inputs to the session reducer. Commands carry the
//! form contents; completion actions carry the settled request outcome.
//! Representing both in one enum keeps the reducer's match exhaustive:
//! adding a variant is a compile error until every consumer handles it.

use composition_api::ApiError;
use serde::{Deserialize, Serialize};

/// Session action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionAction {
    /// Command: the sign-in form was submitted.
    SigninSubmitted {
        /// Account username.
        username: String,
        /// Account password.
        password: String,
    },

    /// Command: the sign-up form was submitted.
    SignupSubmitted {
        /// Desired username.
        username: String,
        /// Account email.
        email: String,
        /// Password.
        password: String,
        /// Password confirmation, validated server-side.
        password_confirm: String,
    },

    /// The sign-in request settled successfully.
    SigninSucceeded {
        /// Bearer token from the response.
        token: String,
    },

    /// The sign-in request settled with a failure.
    ///
    /// Carries the full [`ApiError`] so the reducer can distinguish a
    /// server rejection (fetching flag cleared, logged out) from a
    /// transport failure (state left at the requested marker).
    SigninFailed {
        /// What went wrong.
        error: ApiError,
    },

    /// The sign-up request settled successfully.
    SignupSucceeded {
        /// Bearer token from the response.
        token: String,
    },

    /// The sign-up request settled with a failure.
    SignupFailed {
        /// What went wrong.
        error: ApiError,
    },

    /// Command: the user signed out. No network call.
    SignedOut,
}

impl SessionAction {
    /// `true` for form-submission commands that issue a request.
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::SigninSubmitted { .. } | Self::SignupSubmitted { .. } | Self::SignedOut
        )
    }

    /// `true` for actions that settle an in-flight request.
    ///
    /// This is the predicate the flows wait on after submitting.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::SigninSucceeded { .. }
                | Self::SigninFailed { .. }
                | Self::SignupSucceeded { .. }
                | Self::SignupFailed { .. }
        )
    }
}
