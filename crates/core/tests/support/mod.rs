//! Shared test helpers for `authkit-core` integration tests.
//!
//! In-memory implementations of every host port plus a [`Harness`] that
//! wires them into an `AuthorizationStateMachine` with a pinned clock and
//! deterministic PKCE material, so tests can focus on behaviour.

#![allow(dead_code)]

pub mod host;
pub mod provider;

use std::sync::Arc;

use authkit_common::auth::{NonceSource, Pkce, PkceSource};
use authkit_common::time::MockClock;
use authkit_core::{AuthorizationStateMachine, SessionStorage};
use authkit_domain::constants::{CONVERSATION_STORAGE_KEY, SESSION_STORAGE_KEY};
use authkit_domain::{AuthKitConfig, ConversationState, RefreshLimit, SessionState, Tokens};

pub use host::{MockLocation, MockStorage, RecordingNavigator};
pub use provider::{MockSilentAuthenticator, MockTokenEndpoint};

/// Fixed wall clock used by every harness (2023-11-14T22:13:20Z).
pub const NOW: i64 = 1_700_000_000_000;

pub const ISSUER: &str = "https://issuer.example";
pub const CLIENT_ID: &str = "cid";
pub const ORIGIN: &str = "https://app.example/page";

/// Verifier returned by [`FixedPkce`].
pub const VERIFIER: &str = "V";
/// `base64url(sha256("V"))`
pub const CHALLENGE: &str = "3lpveBFuymLX_FzhWdI65riJs2Whc5rSzzb5JaFA0Mw";
pub const NONCE: &str = "NONCE";

/// PKCE and nonce source returning constant values.
#[derive(Debug, Default)]
pub struct FixedPkce;

impl PkceSource for FixedPkce {
    fn create(&self) -> Pkce {
        Pkce::from_verifier(VERIFIER)
    }
}

impl NonceSource for FixedPkce {
    fn nonce(&self) -> String {
        NONCE.to_string()
    }
}

pub fn config() -> AuthKitConfig {
    AuthKitConfig::new(ISSUER, CLIENT_ID).with_scope(["openid"])
}

/// A state machine plus handles on every mock it talks to.
pub struct Harness {
    pub machine: AuthorizationStateMachine,
    pub storage: Arc<MockStorage>,
    pub location: Arc<MockLocation>,
    pub navigator: Arc<RecordingNavigator>,
    pub endpoint: Arc<MockTokenEndpoint>,
    pub silent: Arc<MockSilentAuthenticator>,
    pub clock: MockClock,
}

impl Harness {
    /// Harness on `href` with the default configuration.
    pub fn new(href: &str) -> Self {
        Self::with_config(href, config())
    }

    pub fn with_refresh_limit(href: &str, limit: RefreshLimit) -> Self {
        Self::with_config(href, config().with_refresh_limit(limit))
    }

    pub fn with_config(href: &str, config: AuthKitConfig) -> Self {
        let storage = Arc::new(MockStorage::default());
        let location = Arc::new(MockLocation::new(href));
        let navigator = Arc::new(RecordingNavigator::default());
        let endpoint = Arc::new(MockTokenEndpoint::default());
        let silent = Arc::new(MockSilentAuthenticator::default());
        let clock = MockClock::at(NOW);

        let machine = AuthorizationStateMachine::builder(config)
            .storage(storage.clone())
            .location(location.clone())
            .navigator(navigator.clone())
            .token_endpoint(endpoint.clone())
            .silent_authenticator(silent.clone())
            .pkce_source(Arc::new(FixedPkce))
            .nonce_source(Arc::new(FixedPkce))
            .clock(Arc::new(clock.clone()))
            .build()
            .expect("state machine");

        Self { machine, storage, location, navigator, endpoint, silent, clock }
    }

    /// Seed the conversation slot as if a redirect had been started earlier.
    pub fn seed_conversation(&self, origin: &str) -> ConversationState {
        let conversation = ConversationState::new(NONCE, VERIFIER, origin);
        self.storage
            .set_item(CONVERSATION_STORAGE_KEY, &serde_json::to_string(&conversation).unwrap())
            .unwrap();
        conversation
    }

    /// Seed the session slot with a session issued at `issued_at`.
    pub fn seed_session(&self, tokens: Tokens, issued_at: i64) -> SessionState {
        let session = SessionState::from_tokens(
            tokens,
            issued_at,
            30,
            Some(serde_json::from_value(serde_json::json!({"sub": "stored-user"})).unwrap()),
        );
        self.storage
            .set_item(SESSION_STORAGE_KEY, &serde_json::to_string(&session).unwrap())
            .unwrap();
        session
    }

    pub fn stored_conversation(&self) -> Option<ConversationState> {
        self.storage
            .get_item(CONVERSATION_STORAGE_KEY)
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    pub fn stored_session(&self) -> Option<SessionState> {
        self.storage.get_item(SESSION_STORAGE_KEY).map(|raw| serde_json::from_str(&raw).unwrap())
    }
}
