//! Pending authorization conversation

use serde::{Deserialize, Serialize};

/// State persisted between starting an authorization request and receiving
/// the provider's response.
///
/// A conversation is valid for exactly one authorization response: it is
/// removed from storage after the first code exchange, error redirect or
/// silent attempt that consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub nonce: String,
    /// PKCE verifier, kept secret until the code exchange.
    pub pkce_verifier: String,
    /// URL to restore once the conversation is finalized; also sent as
    /// `redirect_uri`.
    pub origin_uri: String,
}

impl ConversationState {
    pub fn new(
        nonce: impl Into<String>,
        pkce_verifier: impl Into<String>,
        origin_uri: impl Into<String>,
    ) -> Self {
        Self {
            nonce: nonce.into(),
            pkce_verifier: pkce_verifier.into(),
            origin_uri: origin_uri.into(),
        }
    }
}
