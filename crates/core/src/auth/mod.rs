//! OAuth2 authorization code + PKCE session management
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────┐
//! │ AuthorizationStateMachine  │  decision order, storage transitions
//! └─────────────┬──────────────┘
//!               │
//!               ├──► ConversationStore / SessionStore  (JSON slots over SessionStorage)
//!               ├──► Redirect / Post bindings          (authorize request encoding)
//!               ├──► TokenEndpoint                     (code exchange, refresh, userinfo)
//!               └──► RefreshScheduler                  (cancellable refresh timer)
//! ```
//!
//! Host capabilities (storage, location, navigation, HTTP, silent
//! transport) are injected through the traits in [`ports`].

pub mod binding;
pub mod machine;
pub mod params;
pub mod ports;
pub mod refresh;
pub mod store;

pub use binding::AuthorizeRequest;
pub use machine::{AuthorizationStateMachine, AuthorizationStateMachineBuilder};
pub use params::{AuthorizeParams, StateReturnHandler};
pub use ports::{
    BrowserLocation, CodeExchange, FormPost, Navigator, SessionStorage, SilentAuthenticator,
    SilentRequest, TokenEndpoint,
};
pub use refresh::{RefreshScheduler, MIN_REFRESH_INTERVAL, RefreshStatus, RefreshTarget};
pub use store::{ConversationStore, JsonSlot, SessionStore};
