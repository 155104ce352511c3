//! Authentication: the in-memory credential, token claims, the
//! re-authentication wrapper and the load-time session bootstrap.

mod claims;
mod credentials;
mod reauth;
mod session;

#[cfg(test)]
pub(crate) use claims::encode_token;
pub use claims::{AccessToken, AuthInfo, LoginRequest};
pub use credentials::CredentialStore;
pub use reauth::{ReauthClient, ReauthOutcome, REFRESH_PATH};
pub use session::{BootstrapState, Gate, SessionBootstrap};

pub const LOGIN_PATH: &str = "/auth";
pub const LOGOUT_PATH: &str = "/auth/logout";
