//! Modular common utilities shared across AuthKit crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation` (default): PKCE, JWT payload decoding, clocks
//! - `observability`: debug tracing inside the foundation utilities

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;
#[cfg(feature = "foundation")]
pub mod time;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use auth::{NonceSource, Pkce, PkceGenerator, PkceSource};
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
