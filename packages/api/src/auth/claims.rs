//! Access token payloads and the identity derived from them.
//!
//! The API issues JWTs whose payload looks like:
//!
//! ```json
//! { "UserInfo": { "username": "alice", "roles": ["Employee"] }, "iat": 0, "exp": 0 }
//! ```
//!
//! The client only reads the payload to decide what to show. Signatures are
//! the server's business, so they are not verified here.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use store::Role;

use crate::error::ApiError;

/// `{ accessToken }` body returned by login and refresh.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
}

/// Body of `POST /auth`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(rename = "UserInfo", alias = "userInfo")]
    user_info: UserClaims,
}

#[derive(Debug, Deserialize)]
struct UserClaims {
    username: String,
    #[serde(default)]
    roles: Vec<Role>,
}

/// Who is logged in and what they may do.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthInfo {
    pub username: String,
    pub roles: Vec<Role>,
    pub is_manager: bool,
    pub is_admin: bool,
    /// Highest role held; `Employee` when nothing better applies.
    pub status: Role,
}

impl Default for AuthInfo {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl AuthInfo {
    pub fn anonymous() -> Self {
        Self {
            username: String::new(),
            roles: Vec::new(),
            is_manager: false,
            is_admin: false,
            status: Role::Employee,
        }
    }

    pub fn new(username: impl Into<String>, roles: Vec<Role>) -> Self {
        let is_manager = roles.contains(&Role::Manager);
        let is_admin = roles.contains(&Role::Admin);
        let status = if is_admin {
            Role::Admin
        } else if is_manager {
            Role::Manager
        } else {
            Role::Employee
        };
        Self {
            username: username.into(),
            roles,
            is_manager,
            is_admin,
            status,
        }
    }

    /// Decode the identity from a JWT access token.
    pub fn from_token(token: &str) -> Result<Self, ApiError> {
        let payload = token
            .split('.')
            .nth(1)
            .ok_or_else(|| ApiError::Decode("access token is not a JWT".into()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| ApiError::Decode(format!("access token payload: {e}")))?;
        let claims: Claims = serde_json::from_slice(&bytes)?;
        Ok(Self::new(claims.user_info.username, claims.user_info.roles))
    }

    pub fn is_authenticated(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        self.roles.iter().any(|role| allowed.contains(role))
    }
}

#[cfg(test)]
pub(crate) fn encode_token(username: &str, roles: &[&str]) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::json!({
        "UserInfo": { "username": username, "roles": roles },
        "iat": 1_700_000_000,
        "exp": 1_700_000_900,
    });
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{payload}.signature")
}
