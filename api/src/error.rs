//! Error taxonomy for blog server requests.

use thiserror::Error;

/// Outcome of a failed request.
///
/// The client distinguishes exactly two failure classes, because the UI
/// treats them differently:
///
/// - [`ApiError::Api`]: the server answered with a non-2xx status and a
///   `{message}` body; the message is surfaced inline and recorded as a
///   failed state transition.
/// - [`ApiError::Transport`]: no usable response was obtained; the raw
///   failure text is surfaced inline, and the session reducer leaves its
///   state at the already-dispatched "requested" marker.
#[derive(Debug, Error, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ApiError {
    /// The server rejected the request with a message.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, shown to the user.
        message: String,
    },

    /// The request itself failed: connection refused, timeout, or an
    /// undecodable response body.
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    /// `true` for transport-level failures (no server verdict obtained).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The message to surface inline in the UI.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Api { message, .. } | Self::Transport(message) => message,
        }
    }
}
