//! Error types used throughout AuthKit

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for AuthKit
///
/// Every fallible operation in the workspace returns this type. Variants map
/// one-to-one onto the failure classes a caller has to distinguish:
/// misconfiguration, a provider-reported OAuth error, transport failures and
/// storage write failures.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AuthKitError {
    /// Missing navigator, unknown binding, missing conversation state, or an
    /// invalid configuration value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// OAuth `error` / `error_description` pair returned by the provider,
    /// either on the redirect URL or in a token endpoint response.
    #[error("[{error}] {description}")]
    Provider {
        /// OAuth error code (e.g. `access_denied`).
        error: String,
        /// Human readable description, verbatim from the provider.
        description: String,
    },

    /// Network or host failure while talking to the provider.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The storage capability rejected a write.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthKitError {
    /// Build a provider error from an OAuth error code and optional
    /// description.
    pub fn provider(error: impl Into<String>, description: Option<String>) -> Self {
        Self::Provider { error: error.into(), description: description.unwrap_or_default() }
    }

    /// Stable, machine readable label for the error class.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Provider { .. } => "provider",
            Self::Transport(_) => "transport",
            Self::Storage(_) => "storage",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether a caller-side retry policy may reasonably try again.
    ///
    /// Only transport failures qualify; AuthKit itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// OAuth error code for provider errors.
    #[must_use]
    pub fn oauth_code(&self) -> Option<&str> {
        match self {
            Self::Provider { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AuthKitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization failed: {err}"))
    }
}

/// Result type alias for AuthKit operations
pub type Result<T> = std::result::Result<T, AuthKitError>;

#[cfg(test)]
mod tests {
    //! Unit tests for errors.
    use super::*;

    /// Validates `AuthKitError::provider` behavior for the provider display
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the rendered message embeds both the code and description.
    #[test]
    fn test_provider_display_embeds_code_and_description() {
        let err = AuthKitError::provider("access_denied", Some("user cancelled".to_string()));
        assert_eq!(err.to_string(), "[access_denied] user cancelled");
        assert_eq!(err.oauth_code(), Some("access_denied"));
    }

    /// Validates `AuthKitError::provider` behavior for the missing description
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms an absent description renders as empty.
    #[test]
    fn test_provider_without_description() {
        let err = AuthKitError::provider("invalid_grant", None);
        assert_eq!(err.to_string(), "[invalid_grant] ");
    }

    #[test]
    fn test_kind_and_retryability() {
        assert_eq!(AuthKitError::Configuration("x".into()).kind(), "configuration");
        assert_eq!(AuthKitError::Storage("x".into()).kind(), "storage");
        assert!(AuthKitError::Transport("timeout".into()).is_retryable());
        assert!(!AuthKitError::provider("invalid_grant", None).is_retryable());
        assert!(!AuthKitError::Configuration("x".into()).is_retryable());
    }

    /// Validates serde behavior for the adjacently tagged error scenario.
    ///
    /// Assertions:
    /// - Confirms the `type` tag carries the variant name.
    /// - Confirms the value deserializes back to an equal error.
    #[test]
    fn test_error_serializes_with_type_tag() {
        let err = AuthKitError::provider("access_denied", Some("nope".into()));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Provider");
        assert_eq!(json["message"]["error"], "access_denied");

        let back: AuthKitError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
