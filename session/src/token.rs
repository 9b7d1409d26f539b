//! Bearer token claims decoding.
//!
//! The server issues compact JWS tokens whose payload carries the user's
//! id and username. The client decodes the payload purely for display and
//! never verifies the signature; trusting the token's contents is a
//! server-side concern. Decoding can fail on arbitrary stored strings and
//! must not take the session bootstrap down with it.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims the server embeds in the token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub id: i64,

    /// Username shown in the navbar.
    pub username: String,

    /// Expiry as a unix timestamp, if the server set one.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Token decode failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The string is not a decodable compact JWS token.
    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Decode the claims out of a compact JWS token.
///
/// Splits on `.`, base64url-decodes the payload segment, and parses it
/// as JSON. The signature segment is ignored.
///
/// # Errors
///
/// Returns [`TokenError::Malformed`] if the token does not have three
/// segments or the payload is not base64url-encoded claims JSON.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::Malformed(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("payload is not claims JSON: {e}")))
}
