//! # Re-authentication wrapper
//!
//! Access tokens are short-lived. When an authenticated call comes back `403`,
//! [`ReauthClient`] asks `GET /auth/refresh` for a new token (the refresh
//! cookie rides along automatically), stores it, and replays the original
//! request. The refresh always finishes before the replay starts.
//!
//! The number of renewals per call is bounded by `max_renewals` (1 in the
//! shipped configuration), so one failed call costs at most one extra refresh
//! round trip and one replay.
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | [`ReauthOutcome::Completed`] | No renewal was needed; the first result as-is. |
//! | [`ReauthOutcome::Retried`] | Renewed and replayed; the replay's result, whatever it is. |
//! | [`ReauthOutcome::Exhausted`] | The refresh failed; its error (a `403` reads "your login has expired."). |

use serde_json::Value;

use crate::auth::claims::AccessToken;
use crate::auth::CredentialStore;
use crate::error::ApiError;
use crate::remote::RemoteClient;
use crate::transport::{ApiRequest, Transport};

pub const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Clone, Debug, PartialEq)]
pub enum ReauthOutcome {
    Completed(Result<Value, ApiError>),
    Retried(Result<Value, ApiError>),
    Exhausted(ApiError),
}

impl ReauthOutcome {
    pub fn into_result(self) -> Result<Value, ApiError> {
        match self {
            ReauthOutcome::Completed(result) | ReauthOutcome::Retried(result) => result,
            ReauthOutcome::Exhausted(error) => Err(error),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReauthClient<T> {
    remote: RemoteClient<T>,
    max_renewals: u32,
}

impl<T: Transport> ReauthClient<T> {
    pub fn new(remote: RemoteClient<T>, max_renewals: u32) -> Self {
        Self {
            remote,
            max_renewals,
        }
    }

    pub fn remote(&self) -> &RemoteClient<T> {
        &self.remote
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.remote.credentials()
    }

    /// Run `request`, renewing the access token on `403` at most `max_renewals` times.
    pub async fn execute(&self, request: &ApiRequest) -> ReauthOutcome {
        let mut result = self.remote.call(request).await;
        let mut renewals = 0;

        while renewals < self.max_renewals && matches!(&result, Err(e) if e.is_forbidden()) {
            renewals += 1;
            tracing::info!(route = %request.route(), "access token rejected, refreshing");
            if let Err(error) = self.refresh().await {
                tracing::warn!(route = %request.route(), %error, "token refresh failed");
                return ReauthOutcome::Exhausted(error.into_session_expired());
            }
            result = self.remote.call(request).await;
        }

        if renewals == 0 {
            ReauthOutcome::Completed(result)
        } else {
            ReauthOutcome::Retried(result)
        }
    }

    pub async fn call(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        self.execute(request).await.into_result()
    }

    /// One `GET /auth/refresh`; stores and returns the new token.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let body = self.remote.call(&ApiRequest::get(REFRESH_PATH)).await?;
        let AccessToken { access_token } = serde_json::from_value(body)?;
        self.credentials().set(access_token.clone());
        Ok(access_token)
    }
}
