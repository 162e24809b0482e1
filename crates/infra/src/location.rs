//! `BrowserLocation` for hosts without a DOM.
//!
//! Native apps typically receive the provider's callback on a loopback or
//! custom-scheme URL; feeding it to [`UrlLocation::set`] lets the state
//! machine read `code`/`state`/`error` exactly as it would in a browser.

use authkit_core::BrowserLocation;
use authkit_domain::{AuthKitError, Result};
use parking_lot::RwLock;
use tracing::warn;
use url::Url;

use crate::errors::InfraError;

/// Current location held as a parsed URL.
#[derive(Debug)]
pub struct UrlLocation {
    url: RwLock<Url>,
}

impl UrlLocation {
    /// # Errors
    /// Returns `AuthKitError::Configuration` when `href` is not an absolute
    /// URL.
    pub fn new(href: &str) -> Result<Self> {
        Ok(Self { url: RwLock::new(parse(href)?) })
    }

    /// Replace the current location, e.g. with a received callback URL.
    ///
    /// # Errors
    /// Returns `AuthKitError::Configuration` when `href` is not an absolute
    /// URL; the location is unchanged in that case.
    pub fn set(&self, href: &str) -> Result<()> {
        *self.url.write() = parse(href)?;
        Ok(())
    }
}

fn parse(href: &str) -> Result<Url> {
    Url::parse(href).map_err(|err| AuthKitError::from(InfraError::from(err)))
}

impl BrowserLocation for UrlLocation {
    fn href(&self) -> String {
        self.url.read().to_string()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .read()
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    fn push_state(&self, uri: &str) {
        let joined = self.url.read().join(uri);
        match joined {
            Ok(url) => *self.url.write() = url,
            Err(err) => warn!(error = %err, "ignoring history update with an invalid URL"),
        }
    }
}
