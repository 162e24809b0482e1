//! Port interfaces for the authorization flow
//!
//! These traits define the boundaries between the state machine and the
//! host environment: storage, the current location, navigation, and the
//! provider's HTTP endpoints. Hosts supply adapters; tests supply mocks.

use async_trait::async_trait;
use authkit_domain::{IdentityClaims, Result, Tokens};

/// Key/value session storage scoped to the current tab or process.
pub trait SessionStorage: Send + Sync {
    /// Value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `AuthKitError::Storage` when the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; a missing key is not an error.
    fn remove_item(&self, key: &str);
}

/// Read access to the current page location plus history replacement.
pub trait BrowserLocation: Send + Sync {
    /// Full current URL, including query and fragment.
    fn href(&self) -> String;

    /// Decoded value of the first query parameter named `name`.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Replace the current URL without navigating.
    fn push_state(&self, uri: &str);
}

/// A form submission the host performs on the state machine's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPost {
    /// Target URL of the form.
    pub action: String,
    /// Hidden fields in submission order.
    pub fields: Vec<(String, String)>,
}

/// Full-page navigation capability.
pub trait Navigator: Send + Sync {
    /// Leave the page for `uri`.
    fn navigate(&self, uri: &str);

    /// Build and submit `form` as a POST.
    fn submit_form(&self, form: &FormPost);
}

/// Authorization code exchange request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeExchange {
    /// `code` returned on the redirect.
    pub code: String,
    /// Verifier matching the challenge sent with the authorize request.
    pub code_verifier: String,
    /// Must equal the `redirect_uri` of the authorize request.
    pub redirect_uri: String,
}

/// Token and identity endpoints of the provider.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange an authorization code and PKCE verifier for tokens.
    async fn exchange_code(&self, request: &CodeExchange) -> Result<Tokens>;

    /// Exchange a refresh token for new tokens.
    async fn refresh(&self, refresh_token: &str) -> Result<Tokens>;

    /// Fetch identity claims for an access token.
    async fn fetch_identity_claims(&self, access_token: &str) -> Result<IdentityClaims>;
}

/// Parameters for a silent (non-navigating) token acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilentRequest {
    /// Authorize URL carrying `prompt=none&response_mode=web_message`.
    pub authorize_url: String,
    /// Redirect URI registered with the conversation.
    pub redirect_uri: String,
    /// Nonce expected in the returned id token.
    pub nonce: String,
    /// PKCE verifier for the code the hidden surface receives.
    pub code_verifier: String,
}

/// Hidden-surface transport (e.g. an iframe) for silent authentication.
#[async_trait]
pub trait SilentAuthenticator: Send + Sync {
    /// Attempt to obtain tokens without user interaction.
    ///
    /// `Ok(None)` means the provider has no session to hand out.
    async fn acquire_tokens(&self, request: &SilentRequest) -> Result<Option<Tokens>>;
}
