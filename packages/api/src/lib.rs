//! # API crate — the techNotes REST client
//!
//! Everything the front ends need to talk to the techNotes API: the HTTP
//! transport, token handling with silent re-authentication, the load-time
//! session restore, and cache-backed resources for notes and users.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`transport`] | `Transport` trait, request/response types, `reqwest` implementation |
//! | [`remote`] | Attaches the access token, maps non-2xx responses to [`ApiError`] |
//! | [`auth`] | Credential store, JWT claims, refresh-and-replay wrapper, session bootstrap |
//! | [`resource`] | Fetch and mutate one entity collection through its cache |
//! | [`access`] | Role checks used by the views |
//! | [`forms`] | Username, password and note validation for the forms |
//! | [`config`] | `technotes.toml` client configuration |
//! | [`context`] | [`AppContext`], the handle a UI holds on to |
//! | [`error`] | [`ApiError`] |
//!
//! ## Request flow
//!
//! ```text
//! view ─▶ Resource ─▶ ReauthClient ─▶ RemoteClient ─▶ Transport ─▶ server
//!            │             └── 403 ─▶ GET /auth/refresh ─▶ replay
//!            └── success ─▶ EntityCache (invalidate tags, notify subscribers)
//! ```

pub mod access;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod forms;
pub mod remote;
pub mod resource;
pub mod transport;

#[cfg(test)]
mod testing;

pub use auth::{AuthInfo, BootstrapState, CredentialStore, Gate, ReauthClient, ReauthOutcome};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ApiError, SESSION_EXPIRED_MESSAGE};
pub use remote::RemoteClient;
pub use resource::Resource;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
