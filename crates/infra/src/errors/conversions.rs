//! Conversions from external infrastructure errors into domain errors.

use authkit_domain::AuthKitError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct InfraError(pub AuthKitError);

impl From<InfraError> for AuthKitError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AuthKitError> for InfraError {
    fn from(value: AuthKitError) -> Self {
        Self(value)
    }
}

trait IntoAuthKitError {
    fn into_authkit(self) -> AuthKitError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AuthKitError */
/* -------------------------------------------------------------------------- */

impl IntoAuthKitError for HttpError {
    fn into_authkit(self) -> AuthKitError {
        if self.is_builder() {
            return AuthKitError::Configuration(format!("invalid HTTP request: {self}"));
        }

        if self.is_timeout() {
            return AuthKitError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AuthKitError::Transport("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return AuthKitError::Transport(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        if self.is_decode() {
            return AuthKitError::Transport(format!("malformed HTTP response body: {self}"));
        }

        AuthKitError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_authkit())
    }
}

/* -------------------------------------------------------------------------- */
/* toml / serde_json / url → AuthKitError */
/* -------------------------------------------------------------------------- */

impl IntoAuthKitError for TomlError {
    fn into_authkit(self) -> AuthKitError {
        AuthKitError::Configuration(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        Self(value.into_authkit())
    }
}

impl IntoAuthKitError for JsonError {
    fn into_authkit(self) -> AuthKitError {
        AuthKitError::Configuration(format!("Invalid JSON format: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        Self(value.into_authkit())
    }
}

impl IntoAuthKitError for UrlError {
    fn into_authkit(self) -> AuthKitError {
        AuthKitError::Configuration(format!("invalid URL: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        Self(value.into_authkit())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
