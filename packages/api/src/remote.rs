//! Remote call layer: the single entry point every API operation goes through.

use serde_json::Value;

use crate::auth::CredentialStore;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

/// Attaches the in-memory access token to each request and turns non-2xx
/// responses into [`ApiError::Status`]. Never retries.
#[derive(Clone, Debug)]
pub struct RemoteClient<T> {
    transport: T,
    credentials: CredentialStore,
}

impl<T: Transport> RemoteClient<T> {
    pub fn new(transport: T, credentials: CredentialStore) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn call(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let bearer = self.credentials.get();
        let response = self.transport.send(request, bearer.as_deref()).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(ApiError::from_response(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_bearer_attached_only_when_present() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /notes", 200, json!([]));
        transport.reply("GET /notes", 200, json!([]));

        let credentials = CredentialStore::new();
        let remote = RemoteClient::new(transport.clone(), credentials.clone());

        remote.call(&ApiRequest::get("/notes")).await.unwrap();
        credentials.set("abc");
        remote.call(&ApiRequest::get("/notes")).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].bearer, None);
        assert_eq!(calls[1].bearer.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_retried() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /users", 403, json!({ "message": "Forbidden" }));

        let remote = RemoteClient::new(transport.clone(), CredentialStore::new());
        let err = remote.call(&ApiRequest::get("/users")).await.unwrap_err();

        assert!(err.is_forbidden());
        assert_eq!(transport.count("GET /users"), 1);
        assert_eq!(transport.count("GET /auth/refresh"), 0);
    }
}
