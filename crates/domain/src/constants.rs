//! Protocol constants
//!
//! Centralized location for storage keys, query parameter names and timing
//! defaults shared by every AuthKit crate.

// Storage slots
pub const CONVERSATION_STORAGE_KEY: &str = "__authkit.storage.conversation";
pub const SESSION_STORAGE_KEY: &str = "__authkit.storage.authentication";

// Timing
pub const DEFAULT_REFRESH_LEEWAY_SECS: u64 = 30;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Conversation material
pub const NONCE_LENGTH: usize = 32;
pub const PKCE_VERIFIER_BYTES: usize = 32;
pub const CODE_CHALLENGE_METHOD: &str = "S256";

// Query parameters consumed on return from the provider
pub const CODE_PARAM: &str = "code";
pub const STATE_PARAM: &str = "state";
pub const ERROR_PARAM: &str = "error";
pub const ERROR_DESCRIPTION_PARAM: &str = "error_description";

// Provider endpoint paths, relative to the issuer
pub const AUTHORIZE_PATH: &str = "/authorize";
pub const TOKEN_PATH: &str = "/oauth/token";
pub const USERINFO_PATH: &str = "/userinfo";
pub const LOGOUT_PATH: &str = "/logout";
