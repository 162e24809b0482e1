//! `TokenEndpoint` over HTTP.
//!
//! Token calls are form-encoded POSTs to `{issuer}/oauth/token`. A response
//! body carrying `error` is a provider rejection whatever its HTTP status;
//! anything that is not a JSON token response is a transport failure.

use async_trait::async_trait;
use authkit_core::{CodeExchange, TokenEndpoint};
use authkit_domain::{AuthKitConfig, AuthKitError, IdentityClaims, Result, Tokens};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::client::HttpClient;
use crate::errors::InfraError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    id_token: Option<String>,
    expires_in: Option<Value>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Provider token and userinfo calls.
#[derive(Debug, Clone)]
pub struct HttpTokenEndpoint {
    client: HttpClient,
    client_id: String,
    token_url: String,
    userinfo_url: String,
}

impl HttpTokenEndpoint {
    #[must_use]
    pub fn new(client: HttpClient, config: &AuthKitConfig) -> Self {
        Self {
            client,
            client_id: config.client_id.clone(),
            token_url: config.token_endpoint(),
            userinfo_url: config.userinfo_endpoint(),
        }
    }

    async fn post_token(&self, form: &[(&str, &str)]) -> Result<Tokens> {
        let request = self.client.request(Method::POST, &self.token_url).form(form);
        let response = self.client.send(request).await?;
        let status = response.status();
        let body = response.text().await.map_err(|err| AuthKitError::from(InfraError::from(err)))?;

        parse_token_response(status, &body)
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    #[instrument(skip_all)]
    async fn exchange_code(&self, request: &CodeExchange) -> Result<Tokens> {
        debug!("exchanging authorization code");
        self.post_token(&[
            ("client_id", self.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", request.code.as_str()),
            ("code_verifier", request.code_verifier.as_str()),
            ("redirect_uri", request.redirect_uri.as_str()),
        ])
        .await
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<Tokens> {
        debug!("exchanging refresh token");
        self.post_token(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)]).await
    }

    #[instrument(skip_all)]
    async fn fetch_identity_claims(&self, access_token: &str) -> Result<IdentityClaims> {
        let request =
            self.client.request(Method::GET, &self.userinfo_url).bearer_auth(access_token);
        let response = self.client.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            warn!(%status, "userinfo request rejected");
            return Err(AuthKitError::Transport(format!("userinfo request failed: HTTP {status}")));
        }

        let claims: Map<String, Value> = response.json().await.map_err(|err| {
            AuthKitError::Transport(format!("userinfo response is not a JSON object: {err}"))
        })?;
        Ok(IdentityClaims::from(claims))
    }
}

fn parse_token_response(status: StatusCode, body: &str) -> Result<Tokens> {
    let payload: TokenResponse = serde_json::from_str(body).map_err(|_| {
        AuthKitError::Transport(format!("token endpoint returned a non-JSON body (HTTP {status})"))
    })?;

    if let Some(error) = payload.error {
        warn!(%status, error = %error, "token endpoint returned an OAuth error");
        return Err(AuthKitError::provider(error, payload.error_description));
    }

    let access_token = payload.access_token.ok_or_else(|| {
        AuthKitError::Transport(format!("token response without access_token (HTTP {status})"))
    })?;
    let expires_in = payload.expires_in.as_ref().and_then(parse_expires_in).ok_or_else(|| {
        AuthKitError::Transport("token response without a numeric expires_in".into())
    })?;

    let mut tokens = Tokens::new(access_token, expires_in);
    tokens.refresh_token = payload.refresh_token;
    tokens.id_token = payload.id_token;
    Ok(tokens)
}

/// Some providers send `expires_in` as a string.
fn parse_expires_in(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
