//! HTTP adapters: a single-attempt `reqwest` client and the provider's token
//! endpoint built on it.

mod client;
mod token_endpoint;

pub use client::{HttpClient, HttpClientBuilder};
pub use token_endpoint::HttpTokenEndpoint;
