//! Per-call authorize parameters

use std::fmt;
use std::sync::Arc;

use authkit_domain::AuthorizeMode;
use serde_json::Value;

use super::ports::Navigator;

/// Callback receiving the `state` echoed back by the provider.
pub type StateReturnHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Parameters for a single `authorize()` invocation. Never persisted.
#[derive(Clone, Default)]
pub struct AuthorizeParams {
    /// Binding used when a new conversation has to be started.
    pub mode: AuthorizeMode,
    /// Opaque value round-tripped through the provider.
    pub state: Option<String>,
    /// Return target; defaults to the current URL without its fragment.
    pub redirect_uri: Option<String>,
    /// Requested scopes; empty means the configured default.
    pub scope: Vec<String>,
    /// Extra fields sent with the post binding.
    pub extensions: Option<Value>,
    /// Called with the returned `state` after a successful code exchange.
    pub state_return_handler: Option<StateReturnHandler>,
    /// Overrides the machine's default navigator for this call.
    pub navigator: Option<Arc<dyn Navigator>>,
}

impl AuthorizeParams {
    #[must_use]
    pub fn new(mode: AuthorizeMode) -> Self {
        Self { mode, ..Self::default() }
    }

    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
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
    pub fn with_extensions(mut self, extensions: Value) -> Self {
        self.extensions = Some(extensions);
        self
    }

    #[must_use]
    pub fn with_state_return_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.state_return_handler = Some(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }
}

impl fmt::Debug for AuthorizeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizeParams")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("extensions", &self.extensions)
            .field("state_return_handler", &self.state_return_handler.is_some())
            .field("navigator", &self.navigator.is_some())
            .finish()
    }
}
