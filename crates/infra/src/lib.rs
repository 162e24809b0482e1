//! # AuthKit Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP token endpoint (reqwest)
//! - In-memory storage and URL-backed location for non-browser hosts
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `authkit-core`
//! - Contains all "impure" code (network, environment, files)

use std::sync::Arc;
use std::time::Duration;

use authkit_core::{AuthorizationStateMachine, BrowserLocation, Navigator, SessionStorage};
use authkit_domain::{AuthKitConfig, Result};

pub mod config;
pub mod errors;
pub mod http;
pub mod location;
pub mod observability;
pub mod storage;

pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, HttpTokenEndpoint};
pub use location::UrlLocation;
pub use observability::{init_tracing, LogFormat};
pub use storage::MemoryStorage;

/// Assemble a state machine talking to the configured issuer over HTTP.
///
/// Uses the system clock and random PKCE material.
///
/// # Errors
/// Returns `AuthKitError::Configuration` when the configuration is invalid
/// or the HTTP client cannot be built.
pub fn build_state_machine(
    config: AuthKitConfig,
    storage: Arc<dyn SessionStorage>,
    location: Arc<dyn BrowserLocation>,
    navigator: Arc<dyn Navigator>,
) -> Result<AuthorizationStateMachine> {
    config.validate()?;
    let client =
        HttpClient::builder().timeout(Duration::from_secs(config.http_timeout_secs)).build()?;
    let token_endpoint = HttpTokenEndpoint::new(client, &config);

    AuthorizationStateMachine::builder(config)
        .storage(storage)
        .location(location)
        .navigator(navigator)
        .token_endpoint(Arc::new(token_endpoint))
        .build()
}
