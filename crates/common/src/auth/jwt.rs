//! JWT payload decoding
//!
//! Reads the claims segment of a compact JWS without verifying the
//! signature. Used for displaying id token claims; never for trust
//! decisions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a token payload could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("token has no payload segment")]
    MissingPayload,

    #[error("payload is not valid base64url: {0}")]
    InvalidEncoding(String),

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Decode the payload (second) segment of `token` into a claims map.
///
/// An empty token decodes to an empty map.
///
/// # Errors
/// Returns [`JwtError`] when the payload segment is missing, is not
/// base64url, or does not contain a JSON object.
pub fn decode_payload(token: &str) -> Result<Map<String, Value>, JwtError> {
    if token.trim().is_empty() {
        return Ok(Map::new());
    }

    let payload = token.split('.').nth(1).ok_or(JwtError::MissingPayload)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| JwtError::InvalidEncoding(err.to_string()))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(_) => Err(JwtError::NotAnObject),
        Err(err) => {
            #[cfg(feature = "observability")]
            tracing::debug!(error = %err, "jwt payload is not JSON");
            Err(JwtError::InvalidJson(err.to_string()))
        }
    }
}
