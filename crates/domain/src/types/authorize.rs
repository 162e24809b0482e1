//! Authorization flow types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::session::SessionState;
use crate::errors::AuthKitError;

/// How a new conversation is transmitted to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizeMode {
    /// Full-page redirect with the request encoded in the query string.
    #[default]
    Redirect,
    /// Hidden form POST carrying the same fields plus extensions.
    Post,
    /// Non-navigating token acquisition through a hidden surface.
    Silent,
}

impl AuthorizeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redirect => "redirect",
            Self::Post => "post",
            Self::Silent => "silent",
        }
    }

    /// Whether this mode leaves the current page.
    #[must_use]
    pub const fn navigates(self) -> bool {
        matches!(self, Self::Redirect | Self::Post)
    }
}

impl fmt::Display for AuthorizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorizeMode {
    type Err = AuthKitError;

    /// `get` is accepted as an alias for the redirect binding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" | "get" => Ok(Self::Redirect),
            "post" => Ok(Self::Post),
            "silent" => Ok(Self::Silent),
            _ => Err(AuthKitError::Configuration(format!("Invalid binding {s}"))),
        }
    }
}

/// Observable phase of the authorization state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthPhase {
    #[default]
    NoSession,
    CheckingStorage,
    /// A code was found on the URL and is being exchanged.
    AwaitingCode,
    /// Control was handed to the provider through navigation.
    ConversationStarted,
    Authenticated,
    Errored,
}

/// Result of a successful `authorize()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizeOutcome {
    Authenticated(SessionState),
    /// The browser was sent to the provider; the session arrives with the
    /// next page load.
    ConversationStarted,
    /// A silent attempt completed without a session.
    NoSession,
}

impl AuthorizeOutcome {
    #[must_use]
    pub const fn session(&self) -> Option<&SessionState> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_session(self) -> Option<SessionState> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
