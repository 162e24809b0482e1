//! Authorization state machine
//!
//! [`AuthorizationStateMachine::authorize`] is the single entry point. Each
//! call walks a fixed decision order and stops at the first branch that
//! applies:
//!
//! 1. a stored session is reused (or refreshed inline when expired),
//! 2. an `error` on the URL fails the call with the provider's error,
//! 3. a `code` on the URL is exchanged using the stored conversation,
//! 4. otherwise a new conversation is started through the selected binding.
//!
//! Overlapping `authorize()` calls share one in-flight attempt. The attempt
//! lives only as long as some caller awaits it: once the last caller is
//! dropped it is cancelled, its conversation cleanup runs and the next call
//! starts afresh. Token exchanges and refreshes additionally serialize on an
//! async mutex so a scheduled refresh never interleaves with a code exchange.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authkit_common::auth::{decode_payload, NonceSource, Pkce, PkceGenerator, PkceSource};
use authkit_common::time::{Clock, SystemClock};
use authkit_domain::constants::{CODE_PARAM, ERROR_DESCRIPTION_PARAM, ERROR_PARAM, STATE_PARAM};
use authkit_domain::{
    AuthKitConfig, AuthKitError, AuthPhase, AuthorizeMode, AuthorizeOutcome, ConversationState,
    IdentityClaims, Result, SessionState, Tokens,
};
use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::binding::AuthorizeRequest;
use super::params::AuthorizeParams;
use super::ports::{
    BrowserLocation, CodeExchange, Navigator, SessionStorage, SilentAuthenticator, SilentRequest,
    TokenEndpoint,
};
use super::refresh::{RefreshScheduler, RefreshStatus, RefreshTarget};
use super::store::{conversation_store, session_store, ConversationStore, SessionStore};

type AuthorizeAttempt = BoxFuture<'static, Result<AuthorizeOutcome>>;

/// Slot for the attempt in flight. Only callers hold it strongly.
#[derive(Default)]
struct InFlight {
    generation: u64,
    current: Option<(u64, WeakShared<AuthorizeAttempt>)>,
}

impl InFlight {
    fn join(&self) -> Option<(u64, Shared<AuthorizeAttempt>)> {
        let (generation, attempt) = self.current.as_ref()?;
        attempt.upgrade().map(|attempt| (*generation, attempt))
    }
}

/// OAuth2 authorization code + PKCE session manager.
///
/// Cheap to clone; clones share storage, the in-flight guard and the
/// refresh timer.
#[derive(Clone)]
pub struct AuthorizationStateMachine {
    inner: Arc<Inner>,
    in_flight: Arc<Mutex<InFlight>>,
}

struct Inner {
    config: AuthKitConfig,
    conversations: ConversationStore,
    sessions: SessionStore,
    location: Arc<dyn BrowserLocation>,
    navigator: Option<Arc<dyn Navigator>>,
    token_endpoint: Arc<dyn TokenEndpoint>,
    silent: Option<Arc<dyn SilentAuthenticator>>,
    pkce: Arc<dyn PkceSource>,
    nonces: Arc<dyn NonceSource>,
    clock: Arc<dyn Clock>,
    scheduler: RefreshScheduler,
    phase: RwLock<AuthPhase>,
    exchange_lock: tokio::sync::Mutex<()>,
}

impl AuthorizationStateMachine {
    /// Start building a state machine for `config`.
    #[must_use]
    pub fn builder(config: AuthKitConfig) -> AuthorizationStateMachineBuilder {
        AuthorizationStateMachineBuilder::new(config)
    }

    /// Establish or resume an authenticated session.
    ///
    /// Concurrent callers join the attempt already in flight and receive its
    /// result instead of starting a second conversation. Dropping every
    /// caller cancels the attempt: the URL is restored, the conversation is
    /// consumed and the exchange lock is released.
    ///
    /// # Errors
    /// - `AuthKitError::Configuration` when a navigator or silent
    ///   authenticator required by the mode is missing, or a code arrives
    ///   without a stored conversation
    /// - `AuthKitError::Provider` when the provider reports an OAuth error
    /// - `AuthKitError::Transport` when the token or userinfo call fails
    pub async fn authorize(&self, params: AuthorizeParams) -> Result<AuthorizeOutcome> {
        let (generation, attempt) = {
            let mut in_flight = self.in_flight.lock();
            if let Some((generation, attempt)) = in_flight.join() {
                debug!(generation, "joining in-flight authorize");
                (generation, attempt)
            } else {
                in_flight.generation += 1;
                let generation = in_flight.generation;
                let inner = Arc::clone(&self.inner);
                let attempt = async move { inner.authorize(params).await }.boxed().shared();
                in_flight.current = attempt.downgrade().map(|weak| (generation, weak));
                (generation, attempt)
            }
        };

        let outcome = attempt.await;

        let mut in_flight = self.in_flight.lock();
        if in_flight.current.as_ref().is_some_and(|(current, _)| *current == generation) {
            in_flight.current = None;
        }
        outcome
    }

    /// Refresh the stored session now and re-arm the refresh timer.
    ///
    /// Manual refreshes do not count toward the refresh ceiling.
    ///
    /// # Errors
    /// Returns `AuthKitError::Configuration` when there is no session or it
    /// carries no refresh token, otherwise the token endpoint's error.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<SessionState> {
        let _exchange = self.inner.exchange_lock.lock().await;
        let session = self
            .inner
            .sessions
            .read()
            .ok_or_else(|| AuthKitError::Configuration("no session to refresh".into()))?;

        let session = self.inner.refresh_locked(session).await?;
        self.inner.schedule_refresh(&session);
        self.inner.set_phase(AuthPhase::Authenticated);
        Ok(session)
    }

    /// Replace the session's tokens with externally obtained ones.
    ///
    /// Cached identity claims are kept; they are fetched only when the
    /// session has none yet.
    ///
    /// # Errors
    /// Returns the userinfo call's error or a storage write failure.
    #[instrument(skip_all)]
    pub async fn set_tokens(&self, tokens: Tokens) -> Result<SessionState> {
        let _exchange = self.inner.exchange_lock.lock().await;
        let issued_at = self.inner.clock.now_millis();
        let cached_claims = self.inner.sessions.read().and_then(|s| s.identity_claims);

        let session = self.inner.establish_session(tokens, cached_claims, issued_at).await?;
        self.inner.schedule_refresh(&session);
        self.inner.set_phase(AuthPhase::Authenticated);
        info!("session tokens replaced");
        Ok(session)
    }

    /// Drop the stored session and stop refreshing it.
    pub fn remove_tokens(&self) {
        self.inner.scheduler.cancel();
        self.inner.scheduler.reset();
        self.inner.sessions.clear();
        self.inner.set_phase(AuthPhase::NoSession);
        info!("session tokens removed");
    }

    /// Clear all stored state and navigate to the provider's logout
    /// endpoint, which sends the browser back to `return_to`.
    ///
    /// # Errors
    /// Returns `AuthKitError::Configuration` when no navigator was provided;
    /// storage is left untouched in that case.
    pub fn logout(&self, return_to: &str) -> Result<()> {
        let navigator = self.inner.default_navigator()?;

        self.inner.scheduler.cancel();
        self.inner.scheduler.reset();
        self.inner.conversations.clear();
        self.inner.sessions.clear();
        self.inner.set_phase(AuthPhase::NoSession);

        info!("logging out");
        navigator.navigate(&self.inner.config.logout_endpoint(return_to));
        Ok(())
    }

    /// Stored session, if any.
    #[must_use]
    pub fn session(&self) -> Option<SessionState> {
        self.inner.sessions.read()
    }

    /// Access token of the stored session, expired or not.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.session().map(|session| session.access_token)
    }

    /// Tokens of the stored session with `expires_in` measured from now.
    #[must_use]
    pub fn tokens(&self) -> Option<Tokens> {
        self.session().map(|session| session.tokens(self.inner.clock.now_millis()))
    }

    /// Identity claims cached with the stored session.
    #[must_use]
    pub fn identity_claims(&self) -> Option<IdentityClaims> {
        self.session().and_then(|session| session.identity_claims)
    }

    /// Unverified claims from the stored id token's payload.
    #[must_use]
    pub fn id_token_claims(&self) -> Option<Map<String, Value>> {
        let id_token = self.session()?.id_token?;
        match decode_payload(&id_token) {
            Ok(claims) => Some(claims),
            Err(err) => {
                warn!(error = %err, "stored id token payload could not be decoded");
                None
            }
        }
    }

    /// Whether an unexpired session is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let now = self.inner.clock.now_millis();
        self.session().is_some_and(|session| !session.is_expired(now))
    }

    /// Where the last authorize, refresh or logout left the machine.
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        *self.inner.phase.read()
    }

    /// Subscribe to background refresh progress.
    #[must_use]
    pub fn refresh_events(&self) -> watch::Receiver<RefreshStatus> {
        self.inner.scheduler.subscribe()
    }

    /// Latest background refresh status.
    #[must_use]
    pub fn refresh_status(&self) -> RefreshStatus {
        self.inner.scheduler.status()
    }

    /// Validated configuration the machine was built with.
    #[must_use]
    pub fn config(&self) -> &AuthKitConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for AuthorizationStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationStateMachine")
            .field("issuer", &self.inner.config.issuer)
            .field("client_id", &self.inner.config.client_id)
            .field("phase", &self.phase())
            .field("scheduler", &self.inner.scheduler)
            .finish_non_exhaustive()
    }
}

impl Inner {
    #[instrument(skip_all, fields(mode = %params.mode))]
    async fn authorize(self: Arc<Self>, params: AuthorizeParams) -> Result<AuthorizeOutcome> {
        let _exchange = self.exchange_lock.lock().await;
        let attempt = AttemptGuard::new(&self);
        let outcome = self.authorize_locked(&params).await;
        attempt.complete();
        outcome
    }

    async fn authorize_locked(
        self: &Arc<Self>,
        params: &AuthorizeParams,
    ) -> Result<AuthorizeOutcome> {
        self.set_phase(AuthPhase::CheckingStorage);

        if let Some(session) = self.sessions.read() {
            if let Some(outcome) = self.resume_session(session).await? {
                return Ok(outcome);
            }
        }

        if let Some(error) = self.location.query_param(ERROR_PARAM) {
            return Err(self.fail_from_redirect(error));
        }

        if let Some(code) = self.location.query_param(CODE_PARAM) {
            return self.complete_code_exchange(code, params).await;
        }

        self.start_conversation(params).await
    }

    /// Reuse a stored session. Returns `None` when the session was expired
    /// and could not be refreshed, so the caller falls through.
    async fn resume_session(
        self: &Arc<Self>,
        session: SessionState,
    ) -> Result<Option<AuthorizeOutcome>> {
        if !session.is_expired(self.clock.now_millis()) {
            debug!("reusing stored session");
            self.schedule_refresh(&session);
            self.set_phase(AuthPhase::Authenticated);
            return Ok(Some(AuthorizeOutcome::Authenticated(session)));
        }

        if !session.can_refresh() {
            info!("stored session expired without a refresh token; discarding it");
            self.sessions.clear();
            return Ok(None);
        }

        info!("stored session expired; refreshing before reuse");
        let session = self.refresh_locked(session).await?;
        self.schedule_refresh(&session);
        self.set_phase(AuthPhase::Authenticated);
        Ok(Some(AuthorizeOutcome::Authenticated(session)))
    }

    fn fail_from_redirect(&self, error: String) -> AuthKitError {
        let description = self.location.query_param(ERROR_DESCRIPTION_PARAM);
        warn!(error = %error, "provider returned an authorization error");

        self.scheduler.cancel();
        self.sessions.clear();
        if let Some(conversation) = self.conversations.read() {
            self.location.push_state(&conversation.origin_uri);
            self.conversations.clear();
        }
        self.set_phase(AuthPhase::Errored);

        AuthKitError::provider(error, description)
    }

    async fn complete_code_exchange(
        self: &Arc<Self>,
        code: String,
        params: &AuthorizeParams,
    ) -> Result<AuthorizeOutcome> {
        self.set_phase(AuthPhase::AwaitingCode);
        let returned_state = self.location.query_param(STATE_PARAM);

        let Some(conversation) = self.conversations.read() else {
            self.set_phase(AuthPhase::Errored);
            return Err(AuthKitError::Configuration(
                "nothing in storage: no conversation state for the authorization code".into(),
            ));
        };

        // Conversation is consumed and the URL restored however this ends.
        let cleanup = ConversationCleanup::restoring(self, &conversation.origin_uri);

        let issued_at = self.clock.now_millis();
        let request = CodeExchange {
            code,
            code_verifier: conversation.pkce_verifier.clone(),
            redirect_uri: conversation.origin_uri.clone(),
        };
        let result = match self.token_endpoint.exchange_code(&request).await {
            Ok(tokens) => self.establish_session(tokens, None, issued_at).await,
            Err(err) => Err(err),
        };
        drop(cleanup);

        match result {
            Ok(session) => {
                self.scheduler.reset();
                self.schedule_refresh(&session);
                self.set_phase(AuthPhase::Authenticated);
                info!("authorization code exchanged");
                if let (Some(handler), Some(state)) =
                    (params.state_return_handler.as_ref(), returned_state.as_deref())
                {
                    handler(state);
                }
                Ok(AuthorizeOutcome::Authenticated(session))
            }
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "authorization code exchange failed");
                self.scheduler.cancel();
                self.sessions.clear();
                self.set_phase(AuthPhase::Errored);
                Err(err)
            }
        }
    }

    async fn start_conversation(
        self: &Arc<Self>,
        params: &AuthorizeParams,
    ) -> Result<AuthorizeOutcome> {
        if !params.mode.navigates() {
            return self.silent_authorize(params).await;
        }

        let navigator = match params.navigator.as_ref() {
            Some(navigator) => Arc::clone(navigator),
            None => self.default_navigator()?,
        };
        let (conversation, pkce) = self.begin_conversation(params)?;
        let endpoint = self.config.authorize_endpoint();
        let request = self.authorize_request(&endpoint, params, &conversation, &pkce);

        if params.mode == AuthorizeMode::Post {
            navigator.submit_form(&request.form_post());
        } else {
            navigator.navigate(&request.redirect_url());
        }

        self.set_phase(AuthPhase::ConversationStarted);
        info!(mode = %params.mode, "authorization conversation started");
        Ok(AuthorizeOutcome::ConversationStarted)
    }

    async fn silent_authorize(
        self: &Arc<Self>,
        params: &AuthorizeParams,
    ) -> Result<AuthorizeOutcome> {
        let silent = self.silent.clone().ok_or_else(|| {
            AuthKitError::Configuration(
                "silent authentication requested but no silent authenticator was provided".into(),
            )
        })?;

        let (conversation, pkce) = self.begin_conversation(params)?;
        let _cleanup = ConversationCleanup::discarding(self);

        let endpoint = self.config.authorize_endpoint();
        let request = SilentRequest {
            authorize_url: self
                .authorize_request(&endpoint, params, &conversation, &pkce)
                .silent_url(),
            redirect_uri: conversation.origin_uri.clone(),
            nonce: conversation.nonce.clone(),
            code_verifier: conversation.pkce_verifier.clone(),
        };

        let issued_at = self.clock.now_millis();
        let tokens = match silent.acquire_tokens(&request).await {
            Ok(Some(tokens)) => tokens,
            Ok(None) => {
                info!("silent authentication returned no session");
                self.set_phase(AuthPhase::NoSession);
                return Ok(AuthorizeOutcome::NoSession);
            }
            Err(err) => {
                warn!(error = %err, "silent authentication failed");
                self.set_phase(AuthPhase::Errored);
                return Err(err);
            }
        };

        match self.establish_session(tokens, None, issued_at).await {
            Ok(session) => {
                self.scheduler.reset();
                self.schedule_refresh(&session);
                self.set_phase(AuthPhase::Authenticated);
                info!("silent authentication succeeded");
                Ok(AuthorizeOutcome::Authenticated(session))
            }
            Err(err) => {
                self.set_phase(AuthPhase::Errored);
                Err(err)
            }
        }
    }

    /// Persist a fresh conversation for the request about to be sent.
    fn begin_conversation(&self, params: &AuthorizeParams) -> Result<(ConversationState, Pkce)> {
        let pkce = self.pkce.create();
        let origin_uri =
            params.redirect_uri.clone().unwrap_or_else(|| strip_fragment(&self.location.href()));
        let conversation =
            ConversationState::new(self.nonces.nonce(), pkce.verifier.clone(), origin_uri);

        self.conversations.write(&conversation)?;
        Ok((conversation, pkce))
    }

    fn authorize_request<'a>(
        &'a self,
        endpoint: &'a str,
        params: &'a AuthorizeParams,
        conversation: &'a ConversationState,
        pkce: &'a Pkce,
    ) -> AuthorizeRequest<'a> {
        let scope = if params.scope.is_empty() { &self.config.scope } else { &params.scope };
        AuthorizeRequest {
            endpoint,
            client_id: &self.config.client_id,
            redirect_uri: &conversation.origin_uri,
            state: params.state.as_deref(),
            nonce: &conversation.nonce,
            scope,
            code_challenge: &pkce.challenge,
            extensions: params.extensions.as_ref(),
        }
    }

    /// Fetch claims if needed and persist a session built from `tokens`.
    async fn establish_session(
        &self,
        tokens: Tokens,
        cached_claims: Option<IdentityClaims>,
        issued_at: i64,
    ) -> Result<SessionState> {
        let claims = match cached_claims {
            Some(claims) => claims,
            None => self.token_endpoint.fetch_identity_claims(&tokens.access_token).await?,
        };

        let session = SessionState::from_tokens(
            tokens,
            issued_at,
            self.config.refresh_leeway_secs,
            Some(claims),
        );
        self.sessions.write(&session)?;
        Ok(session)
    }

    /// Run one refresh-token exchange. Caller holds `exchange_lock`.
    async fn refresh_locked(&self, mut session: SessionState) -> Result<SessionState> {
        let refresh_token = session.refresh_token.clone().ok_or_else(|| {
            AuthKitError::Configuration("session has no refresh token".into())
        })?;

        let issued_at = self.clock.now_millis();
        let tokens = match self.token_endpoint.refresh(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(err) => {
                if matches!(err, AuthKitError::Provider { .. }) {
                    warn!(error = %err, "provider rejected the refresh token; clearing session");
                    self.sessions.clear();
                    self.set_phase(AuthPhase::Errored);
                }
                return Err(err);
            }
        };

        if self.sessions.read().is_none() {
            return Err(AuthKitError::Configuration(
                "session was removed while the refresh was in flight".into(),
            ));
        }

        session.apply_refresh(tokens, issued_at, self.config.refresh_leeway_secs);
        self.sessions.write(&session)?;
        Ok(session)
    }

    fn schedule_refresh(self: &Arc<Self>, session: &SessionState) {
        let delay = Duration::from_millis(session.millis_until_refresh(self.clock.now_millis()));
        self.scheduler.schedule(Arc::downgrade(self), delay);
    }

    fn default_navigator(&self) -> Result<Arc<dyn Navigator>> {
        self.navigator
            .clone()
            .ok_or_else(|| AuthKitError::Configuration("redirect handler not provided".into()))
    }

    fn set_phase(&self, phase: AuthPhase) {
        *self.phase.write() = phase;
    }
}

#[async_trait]
impl RefreshTarget for Inner {
    async fn refresh_due(&self) -> Result<Duration> {
        let _exchange = self.exchange_lock.lock().await;
        let session = self.sessions.read().ok_or_else(|| {
            AuthKitError::Configuration("session was removed before the scheduled refresh".into())
        })?;

        let session = self.refresh_locked(session).await?;
        self.set_phase(AuthPhase::Authenticated);
        Ok(Duration::from_millis(session.millis_until_refresh(self.clock.now_millis())))
    }
}

/// Resets the phase when an authorize attempt is dropped before finishing.
struct AttemptGuard<'a> {
    inner: &'a Inner,
    completed: bool,
}

impl<'a> AttemptGuard<'a> {
    const fn new(inner: &'a Inner) -> Self {
        Self { inner, completed: false }
    }

    fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            warn!("authorize attempt cancelled before completion");
            self.inner.set_phase(AuthPhase::NoSession);
        }
    }
}

/// Drop guard that consumes the stored conversation and optionally restores
/// the URL, on every exit path including cancellation.
struct ConversationCleanup<'a> {
    inner: &'a Inner,
    restore_uri: Option<String>,
}

impl<'a> ConversationCleanup<'a> {
    fn restoring(inner: &'a Inner, uri: &str) -> Self {
        Self { inner, restore_uri: Some(uri.to_string()) }
    }

    const fn discarding(inner: &'a Inner) -> Self {
        Self { inner, restore_uri: None }
    }
}

impl Drop for ConversationCleanup<'_> {
    fn drop(&mut self) {
        self.inner.conversations.clear();
        if let Some(uri) = self.restore_uri.take() {
            self.inner.location.push_state(&uri);
        }
    }
}

fn strip_fragment(href: &str) -> String {
    href.split_once('#').map_or(href, |(base, _)| base).to_string()
}

/// Builder for [`AuthorizationStateMachine`].
pub struct AuthorizationStateMachineBuilder {
    config: AuthKitConfig,
    storage: Option<Arc<dyn SessionStorage>>,
    location: Option<Arc<dyn BrowserLocation>>,
    token_endpoint: Option<Arc<dyn TokenEndpoint>>,
    navigator: Option<Arc<dyn Navigator>>,
    silent: Option<Arc<dyn SilentAuthenticator>>,
    pkce: Option<Arc<dyn PkceSource>>,
    nonces: Option<Arc<dyn NonceSource>>,
    clock: Option<Arc<dyn Clock>>,
}

impl AuthorizationStateMachineBuilder {
    fn new(config: AuthKitConfig) -> Self {
        Self {
            config,
            storage: None,
            location: None,
            token_endpoint: None,
            navigator: None,
            silent: None,
            pkce: None,
            nonces: None,
            clock: None,
        }
    }

    /// Key/value storage holding the conversation and session. Required.
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Current page URL and history access. Required.
    #[must_use]
    pub fn location(mut self, location: Arc<dyn BrowserLocation>) -> Self {
        self.location = Some(location);
        self
    }

    /// Token and userinfo calls. Required.
    #[must_use]
    pub fn token_endpoint(mut self, token_endpoint: Arc<dyn TokenEndpoint>) -> Self {
        self.token_endpoint = Some(token_endpoint);
        self
    }

    /// Default navigator for redirects, form posts and logout.
    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Enables `AuthorizeMode::Silent`.
    #[must_use]
    pub fn silent_authenticator(mut self, silent: Arc<dyn SilentAuthenticator>) -> Self {
        self.silent = Some(silent);
        self
    }

    /// Override PKCE generation. Defaults to [`PkceGenerator`].
    #[must_use]
    pub fn pkce_source(mut self, pkce: Arc<dyn PkceSource>) -> Self {
        self.pkce = Some(pkce);
        self
    }

    /// Override nonce generation. Defaults to [`PkceGenerator`].
    #[must_use]
    pub fn nonce_source(mut self, nonces: Arc<dyn NonceSource>) -> Self {
        self.nonces = Some(nonces);
        self
    }

    /// Override the wall clock. Defaults to [`SystemClock`].
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and assemble the state machine.
    ///
    /// # Errors
    /// Returns `AuthKitError::Configuration` for an invalid configuration or
    /// when storage, location or the token endpoint were not provided.
    pub fn build(self) -> Result<AuthorizationStateMachine> {
        self.config.validate()?;
        let storage = self.storage.ok_or_else(|| missing("session storage"))?;
        let location = self.location.ok_or_else(|| missing("browser location"))?;
        let token_endpoint = self.token_endpoint.ok_or_else(|| missing("token endpoint"))?;

        let inner = Inner {
            conversations: conversation_store(Arc::clone(&storage)),
            sessions: session_store(storage),
            location,
            navigator: self.navigator,
            token_endpoint,
            silent: self.silent,
            pkce: self.pkce.unwrap_or_else(|| Arc::new(PkceGenerator)),
            nonces: self.nonces.unwrap_or_else(|| Arc::new(PkceGenerator)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            scheduler: RefreshScheduler::new(self.config.refresh_limit),
            phase: RwLock::new(AuthPhase::NoSession),
            exchange_lock: tokio::sync::Mutex::new(()),
            config: self.config,
        };

        debug!(issuer = %inner.config.issuer, "authorization state machine ready");
        Ok(AuthorizationStateMachine {
            inner: Arc::new(inner),
            in_flight: Arc::new(Mutex::new(InFlight::default())),
        })
    }
}

fn missing(what: &str) -> AuthKitError {
    AuthKitError::Configuration(format!("{what} not provided"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fragment() {
        assert_eq!(strip_fragment("https://app.example/a?x=1#frag"), "https://app.example/a?x=1");
        assert_eq!(strip_fragment("https://app.example/a"), "https://app.example/a");
    }
}
