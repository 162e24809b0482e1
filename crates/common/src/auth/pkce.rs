//! PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
//!
//! Implements RFC 7636 with the `S256` method. Public clients running in a
//! browser or on a desktop cannot hold a client secret, so every
//! authorization request is bound to a one-time verifier instead.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

use super::traits::{NonceSource, PkceSource};

/// Number of random bytes behind each verifier (256 bits).
pub const VERIFIER_BYTES: usize = 32;

/// Length of generated nonces.
pub const NONCE_LENGTH: usize = 32;

/// Encode raw bytes as a verifier.
///
/// URL-safe base64 without padding, so the result never contains `+`, `/`
/// or `=`.
#[must_use]
pub fn encode_verifier(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a cryptographically secure code verifier
///
/// 32 random bytes encode to 43 characters, inside the 43-128 range RFC 7636
/// requires.
#[must_use]
pub fn generate_code_verifier() -> String {
    let mut bytes = [0u8; VERIFIER_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    encode_verifier(&bytes)
}

/// Generate code challenge from verifier using SHA256
///
/// `BASE64URL(SHA256(ASCII(code_verifier)))`
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Generate an alphanumeric nonce of `length` characters.
#[must_use]
pub fn generate_nonce(length: usize) -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(length).map(char::from).collect()
}

/// Verifier / challenge pair for one authorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkce {
    /// Kept secret until the token exchange.
    pub verifier: String,
    /// Sent with the authorization request.
    pub challenge: String,
}

impl Pkce {
    /// Derive the challenge for an existing verifier.
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = generate_code_challenge(&verifier);
        Self { verifier, challenge }
    }

    /// Get the challenge method (always "S256" for SHA256)
    #[must_use]
    pub const fn challenge_method(&self) -> &'static str {
        "S256"
    }
}

/// Default randomness source backed by the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PkceGenerator;

impl PkceGenerator {
    /// Generate a fresh PKCE pair.
    #[must_use]
    pub fn generate() -> Pkce {
        Pkce::from_verifier(generate_code_verifier())
    }
}

impl PkceSource for PkceGenerator {
    fn create(&self) -> Pkce {
        Self::generate()
    }
}

impl NonceSource for PkceGenerator {
    fn nonce(&self) -> String {
        generate_nonce(NONCE_LENGTH)
    }
}
