//! Client configuration
//!
//! `AuthKitConfig` describes one OAuth client registered with one issuer.
//! It is deserialized from TOML/JSON files or assembled from environment
//! variables by the infra config loader.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AUTHORIZE_PATH, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_REFRESH_LEEWAY_SECS, LOGOUT_PATH,
    TOKEN_PATH, USERINFO_PATH,
};
use crate::errors::{AuthKitError, Result};

/// Ceiling on scheduled background refreshes.
///
/// Serialized as an integer: any negative value (conventionally `-1`) means
/// unlimited, anything else is the maximum number of scheduled refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RefreshLimit {
    #[default]
    Unlimited,
    Limited(u32),
}

impl RefreshLimit {
    /// Whether another refresh may run after `completed` scheduled refreshes.
    #[must_use]
    pub const fn allows(self, completed: u32) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Limited(max) => completed < max,
        }
    }
}

impl From<i64> for RefreshLimit {
    fn from(value: i64) -> Self {
        if value < 0 {
            Self::Unlimited
        } else {
            Self::Limited(u32::try_from(value).unwrap_or(u32::MAX))
        }
    }
}

impl From<RefreshLimit> for i64 {
    fn from(value: RefreshLimit) -> Self {
        match value {
            RefreshLimit::Unlimited => -1,
            RefreshLimit::Limited(max) => Self::from(max),
        }
    }
}

impl fmt::Display for RefreshLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::Limited(max) => write!(f, "{max}"),
        }
    }
}

/// OAuth client configuration for a single issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKitConfig {
    /// Issuer base URL, e.g. `https://issuer.example`.
    pub issuer: String,
    pub client_id: String,
    /// Default scopes, used when a call does not supply its own.
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default)]
    pub refresh_limit: RefreshLimit,
    /// Seconds subtracted from `expires_in` when computing the stored expiry.
    #[serde(default = "default_refresh_leeway_secs")]
    pub refresh_leeway_secs: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

const fn default_refresh_leeway_secs() -> u64 {
    DEFAULT_REFRESH_LEEWAY_SECS
}

const fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl AuthKitConfig {
    /// Create a configuration with default scope, leeway and limits.
    pub fn new(issuer: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            client_id: client_id.into(),
            scope: Vec::new(),
            refresh_limit: RefreshLimit::default(),
            refresh_leeway_secs: DEFAULT_REFRESH_LEEWAY_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_refresh_limit(mut self, limit: RefreshLimit) -> Self {
        self.refresh_limit = limit;
        self
    }

    /// Check that the issuer and client id are usable.
    ///
    /// # Errors
    /// Returns `AuthKitError::Configuration` for an empty client id or an
    /// issuer that is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(AuthKitError::Configuration("client_id must not be empty".into()));
        }
        let issuer = self.issuer_base();
        if issuer.is_empty() {
            return Err(AuthKitError::Configuration("issuer must not be empty".into()));
        }
        if !(issuer.starts_with("https://") || issuer.starts_with("http://")) {
            return Err(AuthKitError::Configuration(format!(
                "issuer must be an http(s) URL: {issuer}"
            )));
        }
        Ok(())
    }

    /// Issuer without trailing slashes.
    #[must_use]
    pub fn issuer_base(&self) -> &str {
        self.issuer.trim().trim_end_matches('/')
    }

    #[must_use]
    pub fn authorize_endpoint(&self) -> String {
        format!("{}{AUTHORIZE_PATH}", self.issuer_base())
    }

    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("{}{TOKEN_PATH}", self.issuer_base())
    }

    /// Identity claims endpoint including the `client_id` query parameter.
    #[must_use]
    pub fn userinfo_endpoint(&self) -> String {
        format!(
            "{}{USERINFO_PATH}?client_id={}",
            self.issuer_base(),
            urlencoding::encode(&self.client_id)
        )
    }

    /// Logout endpoint carrying the caller's return target.
    #[must_use]
    pub fn logout_endpoint(&self, return_to: &str) -> String {
        format!(
            "{}{LOGOUT_PATH}?return_to={}",
            self.issuer_base(),
            urlencoding::encode(return_to)
        )
    }
}
