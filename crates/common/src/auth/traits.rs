//! Randomness seams for the authorization flow
//!
//! The state machine draws PKCE pairs and nonces through these traits so
//! tests can substitute fixed values.

use super::pkce::Pkce;

/// Source of PKCE verifier / challenge pairs.
pub trait PkceSource: Send + Sync {
    fn create(&self) -> Pkce;
}

/// Source of request nonces.
pub trait NonceSource: Send + Sync {
    fn nonce(&self) -> String;
}
