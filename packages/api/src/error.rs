//! Error taxonomy for calls against the techNotes API.

use serde_json::Value;
use thiserror::Error;

use crate::transport::ApiResponse;

/// Message shown when the refresh cookie itself has been rejected.
pub const SESSION_EXPIRED_MESSAGE: &str = "your login has expired.";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP status (offline, DNS, CORS, ...).
    #[error("No server response")]
    NoResponse(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl ApiError {
    /// Build a status error from a non-2xx response, preferring the server's `message`.
    pub fn from_response(response: ApiResponse) -> Self {
        let message = match &response.body {
            Value::Object(map) => map.get("message").and_then(Value::as_str).map(str::to_owned),
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
        .unwrap_or_else(|| format!("request failed with status {}", response.status));

        ApiError::Status {
            status: response.status,
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// A 403 from the refresh endpoint means the session is gone for good.
    pub fn into_session_expired(self) -> Self {
        match self {
            ApiError::Status { status: 403, .. } => ApiError::Status {
                status: 403,
                message: SESSION_EXPIRED_MESSAGE.to_string(),
            },
            other => other,
        }
    }

    /// Message for the login form.
    pub fn login_message(&self) -> String {
        match self {
            ApiError::NoResponse(_) => "No server response".to_string(),
            ApiError::Status { status: 400, .. } => "Missing username or password".to_string(),
            ApiError::Status { status: 401, .. } => "Unauthorized".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Value) -> ApiResponse {
        ApiResponse { status, body }
    }

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ApiError::from_response(response(409, json!({ "message": "Duplicate username" })));
        assert_eq!(err.to_string(), "Duplicate username");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_missing_message_falls_back_to_status() {
        let err = ApiError::from_response(response(502, Value::Null));
        assert_eq!(err.to_string(), "request failed with status 502");
    }

    #[test]
    fn test_login_messages() {
        assert_eq!(ApiError::NoResponse("refused".into()).login_message(), "No server response");
        assert_eq!(
            ApiError::from_response(response(400, json!({ "message": "All fields are required" }))).login_message(),
            "Missing username or password"
        );
        assert_eq!(ApiError::from_response(response(401, Value::Null)).login_message(), "Unauthorized");
        assert_eq!(
            ApiError::from_response(response(429, json!({ "message": "Too many login attempts" }))).login_message(),
            "Too many login attempts"
        );
    }

    #[test]
    fn test_only_forbidden_becomes_expired() {
        let forbidden = ApiError::from_response(response(403, json!({ "message": "Forbidden" })));
        assert_eq!(forbidden.into_session_expired().to_string(), SESSION_EXPIRED_MESSAGE);

        let unauthorized = ApiError::from_response(response(401, json!({ "message": "Unauthorized" })));
        assert_eq!(unauthorized.into_session_expired().to_string(), "Unauthorized");
    }
}
