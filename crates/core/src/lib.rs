//! # AuthKit Core
//!
//! Authorization flow logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The authorization state machine and its refresh scheduler
//! - Port/adapter interfaces (traits) for host capabilities
//! - Storage slots and authorize request bindings
//!
//! ## Architecture Principles
//! - Only depends on `authkit-common` and `authkit-domain`
//! - No HTTP, DOM, or platform code
//! - All external dependencies via traits
//! - Pure, testable decision logic

pub mod auth;

// Re-export specific items to avoid ambiguity
pub use auth::ports::{
    BrowserLocation, CodeExchange, FormPost, Navigator, SessionStorage, SilentAuthenticator,
    SilentRequest, TokenEndpoint,
};
pub use auth::{
    AuthorizationStateMachine, AuthorizationStateMachineBuilder, AuthorizeParams, RefreshStatus,
};
