//! # AuthKit Domain
//!
//! Domain types for the OAuth2/OIDC authorization code + PKCE flow.
//!
//! This crate contains:
//! - Persisted records (conversation and session state)
//! - Domain error types and Result definitions
//! - Client configuration
//! - Protocol constants (storage keys, endpoint paths, query parameters)
//!
//! ## Architecture
//! - No dependencies on other AuthKit crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
