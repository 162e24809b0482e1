//! Token and session types
//!
//! `Tokens` is the transient shape returned by the token endpoint; it carries
//! a relative `expires_in`. `SessionState` is what gets persisted: the same
//! tokens with an absolute expiry so the schedule survives storage
//! round-trips and reloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tokens as issued by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Lifetime in seconds, relative to issuance.
    pub expires_in: i64,
}

impl Tokens {
    pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self { access_token: access_token.into(), refresh_token: None, id_token: None, expires_in }
    }

    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    #[must_use]
    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(id_token.into());
        self
    }
}

/// Identity claims returned by the userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityClaims(Map<String, Value>);

impl IdentityClaims {
    #[must_use]
    pub const fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// The `sub` claim, if present and a string.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    #[must_use]
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for IdentityClaims {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

/// Authenticated session persisted in the session storage slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Absolute expiry in epoch milliseconds, already reduced by the refresh
    /// leeway.
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_claims: Option<IdentityClaims>,
}

impl SessionState {
    /// Convert freshly issued tokens into a persistable session.
    ///
    /// `expires_at = issued_at_ms + max(expires_in - leeway_secs, 0) * 1000`,
    /// so a timer armed for `expires_at` fires `leeway_secs` before the
    /// provider-side expiry.
    #[must_use]
    pub fn from_tokens(
        tokens: Tokens,
        issued_at_ms: i64,
        leeway_secs: u64,
        identity_claims: Option<IdentityClaims>,
    ) -> Self {
        Self {
            expires_at: expiry_millis(tokens.expires_in, issued_at_ms, leeway_secs),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            id_token: tokens.id_token,
            identity_claims,
        }
    }

    /// Replace tokens after a refresh.
    ///
    /// The refresh and id tokens are only replaced when the provider issued
    /// new ones. Identity claims are left untouched.
    pub fn apply_refresh(&mut self, tokens: Tokens, issued_at_ms: i64, leeway_secs: u64) {
        self.expires_at = expiry_millis(tokens.expires_in, issued_at_ms, leeway_secs);
        self.access_token = tokens.access_token;
        if let Some(refresh_token) = tokens.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        if let Some(id_token) = tokens.id_token {
            self.id_token = Some(id_token);
        }
    }

    #[must_use]
    pub const fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }

    /// Milliseconds until the refresh instant, zero when already due.
    #[must_use]
    pub fn millis_until_refresh(&self, now_ms: i64) -> u64 {
        u64::try_from(self.expires_at.saturating_sub(now_ms)).unwrap_or(0)
    }

    #[must_use]
    pub const fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Tokens view of the session with `expires_in` relative to `now_ms`.
    #[must_use]
    pub fn tokens(&self, now_ms: i64) -> Tokens {
        let remaining = self.expires_at.saturating_sub(now_ms).max(0) / 1000;
        Tokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            id_token: self.id_token.clone(),
            expires_in: remaining,
        }
    }
}

fn expiry_millis(expires_in: i64, issued_at_ms: i64, leeway_secs: u64) -> i64 {
    let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);
    let lifetime_secs = expires_in.saturating_sub(leeway).max(0);
    issued_at_ms.saturating_add(lifetime_secs.saturating_mul(1000))
}
