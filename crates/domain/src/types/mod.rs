//! Domain types and models
//!
//! Persisted records (`ConversationState`, `SessionState`), the transient
//! token shape, and the enums describing authorization flow progress.

pub mod authorize;
pub mod conversation;
pub mod session;

pub use authorize::{AuthPhase, AuthorizeMode, AuthorizeOutcome};
pub use conversation::ConversationState;
pub use session::{IdentityClaims, SessionState, Tokens};
