//! OAuth 2.0 + PKCE primitives
//!
//! Pure building blocks used by the authorization state machine in
//! `authkit-core`:
//!
//! - **PKCE**: RFC 7636 verifier / challenge generation (`S256`) and nonces
//! - **JWT**: unverified payload decoding for id token display
//! - **Traits**: randomness seams so tests can pin generated values
//!
//! # Usage Example
//!
//! ```
//! use authkit_common::auth::{generate_code_challenge, PkceGenerator, PkceSource};
//!
//! let pkce = PkceGenerator.create();
//! assert_eq!(pkce.challenge, generate_code_challenge(&pkce.verifier));
//! assert_eq!(pkce.challenge_method(), "S256");
//! ```

pub mod jwt;
pub mod pkce;
pub mod traits;

pub use jwt::{decode_payload, JwtError};
pub use pkce::{
    encode_verifier, generate_code_challenge, generate_code_verifier, generate_nonce, Pkce,
    PkceGenerator,
};
pub use traits::{NonceSource, PkceSource};
