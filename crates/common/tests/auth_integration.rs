//! Integration tests for auth module
//!
//! Exercises the PKCE, nonce and JWT helpers through the public API, the way
//! the authorization state machine consumes them.

#![cfg(feature = "foundation")]

use std::collections::HashSet;
use std::time::Duration;

use authkit_common::auth::{
    decode_payload, encode_verifier, generate_code_challenge, JwtError, NonceSource, Pkce,
    PkceGenerator, PkceSource,
};
use authkit_common::time::{Clock, MockClock};
use serde_json::json;

/// Validates PKCE pair generation through the `PkceSource` seam.
///
/// Verifiers must be 43 URL-safe characters and every challenge must be the
/// S256 transform of its verifier.
///
/// # Test Steps
/// 1. Generate pairs through a trait object
/// 2. Recompute each challenge from its verifier
/// 3. Verify the whole batch is distinct
#[test]
fn test_pkce_source_generates_bound_pairs() {
    let source: &dyn PkceSource = &PkceGenerator;
    let mut verifiers = HashSet::new();

    for _ in 0..200 {
        let pkce = source.create();
        assert_eq!(pkce.verifier.len(), 43);
        assert!(pkce.verifier.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(pkce, Pkce::from_verifier(pkce.verifier.clone()));
        verifiers.insert(pkce.verifier);
    }

    assert_eq!(verifiers.len(), 200);
}

/// Validates the RFC 7636 appendix B example.
#[test]
fn test_rfc7636_vector() {
    let bytes: [u8; 32] = [
        116, 24, 223, 180, 151, 153, 224, 37, 79, 250, 96, 125, 216, 173, 187, 186, 22, 212, 37,
        77, 105, 214, 191, 240, 91, 88, 5, 88, 83, 132, 141, 121,
    ];
    let verifier = encode_verifier(&bytes);

    assert_eq!(verifier, "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(generate_code_challenge(&verifier), "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn test_nonces_are_alphanumeric_and_distinct() {
    let first = PkceGenerator.nonce();
    let second = PkceGenerator.nonce();

    assert_eq!(first.len(), 32);
    assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(first, second);
}

/// Validates unverified id token payload decoding.
///
/// # Test Steps
/// 1. Decode a well-formed HS256 token
/// 2. Verify a token without a payload segment is rejected
#[test]
fn test_decode_id_token_payload() {
    let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                 eyJrZXkxIjoxMjAwLCJrZXkyIjoiVmFsdWVBQkMifQ.\
                 lsm6sd9V8Zry71LB-8btsFdcnmUYls4TubXqV7pn7aw";

    let claims = decode_payload(token).expect("payload");
    assert_eq!(claims.get("key1"), Some(&json!(1200)));
    assert_eq!(claims.get("key2"), Some(&json!("ValueABC")));

    assert_eq!(decode_payload("header-only"), Err(JwtError::MissingPayload));
}

#[test]
fn test_mock_clock_clones_share_time() {
    let clock = MockClock::at(1_000);
    let shared = clock.clone();

    clock.advance(Duration::from_secs(2));
    assert_eq!(shared.now_millis(), 3_000);

    shared.set_millis(0);
    assert_eq!(clock.now_millis(), 0);
}
