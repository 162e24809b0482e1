//! Scripted provider endpoints.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use authkit_core::{CodeExchange, SilentAuthenticator, SilentRequest, TokenEndpoint};
use authkit_domain::{AuthKitError, IdentityClaims, Result, Tokens};
use parking_lot::Mutex;
use serde_json::json;

/// `TokenEndpoint` replaying queued responses and recording every call.
///
/// An empty queue answers with a transport error.
#[derive(Debug, Default)]
pub struct MockTokenEndpoint {
    exchange_responses: Mutex<VecDeque<Result<Tokens>>>,
    refresh_responses: Mutex<VecDeque<Result<Tokens>>>,
    exchange_calls: Mutex<Vec<CodeExchange>>,
    refresh_calls: Mutex<Vec<String>>,
    claims_calls: Mutex<Vec<String>>,
    latency: Mutex<Option<Duration>>,
}

impl MockTokenEndpoint {
    pub fn push_exchange(&self, response: Result<Tokens>) {
        self.exchange_responses.lock().push_back(response);
    }

    pub fn push_refresh(&self, response: Result<Tokens>) {
        self.refresh_responses.lock().push_back(response);
    }

    /// Delay every exchange by `latency` (on the tokio clock).
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    pub fn exchange_calls(&self) -> Vec<CodeExchange> {
        self.exchange_calls.lock().clone()
    }

    pub fn refresh_calls(&self) -> Vec<String> {
        self.refresh_calls.lock().clone()
    }

    pub fn claims_calls(&self) -> Vec<String> {
        self.claims_calls.lock().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.exchange_calls.lock().len()
            + self.refresh_calls.lock().len()
            + self.claims_calls.lock().len()
    }

    fn next(queue: &Mutex<VecDeque<Result<Tokens>>>) -> Result<Tokens> {
        queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AuthKitError::Transport("no scripted response".into())))
    }
}

#[async_trait]
impl TokenEndpoint for MockTokenEndpoint {
    async fn exchange_code(&self, request: &CodeExchange) -> Result<Tokens> {
        self.exchange_calls.lock().push(request.clone());
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Self::next(&self.exchange_responses)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Tokens> {
        self.refresh_calls.lock().push(refresh_token.to_string());
        Self::next(&self.refresh_responses)
    }

    async fn fetch_identity_claims(&self, access_token: &str) -> Result<IdentityClaims> {
        self.claims_calls.lock().push(access_token.to_string());
        Ok(serde_json::from_value(json!({"sub": "user-1", "name": "Ada"})).unwrap())
    }
}

/// Silent authenticator returning a scripted answer.
#[derive(Debug, Default)]
pub struct MockSilentAuthenticator {
    response: Mutex<Option<Result<Option<Tokens>>>>,
    requests: Mutex<Vec<SilentRequest>>,
}

impl MockSilentAuthenticator {
    pub fn respond_with(&self, response: Result<Option<Tokens>>) {
        *self.response.lock() = Some(response);
    }

    pub fn requests(&self) -> Vec<SilentRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SilentAuthenticator for MockSilentAuthenticator {
    async fn acquire_tokens(&self, request: &SilentRequest) -> Result<Option<Tokens>> {
        self.requests.lock().push(request.clone());
        self.response.lock().take().unwrap_or(Ok(None))
    }
}
