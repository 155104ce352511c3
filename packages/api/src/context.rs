//! # Application context
//!
//! [`AppContext`] is the one object a front end holds on to. It owns the
//! configuration, the re-authenticating client, the "trust this device"
//! preference, the session bootstrap and the two entity caches, and exposes
//! the login and logout flows that touch all of them at once.
//!
//! Clones are cheap and share everything.

use std::sync::Arc;

use store::{EntityCache, KeyValueStore, Note, PersistPreference, User};

use crate::auth::{
    AccessToken, AuthInfo, BootstrapState, CredentialStore, Gate, LoginRequest, ReauthClient,
    SessionBootstrap, LOGIN_PATH, LOGOUT_PATH,
};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::remote::RemoteClient;
use crate::resource::Resource;
use crate::transport::{ApiRequest, HttpTransport, Method, Transport};

struct Inner<T, S> {
    config: ClientConfig,
    client: ReauthClient<T>,
    persist: PersistPreference<S>,
    bootstrap: SessionBootstrap,
    notes: EntityCache<Note, ApiError>,
    users: EntityCache<User, ApiError>,
}

pub struct AppContext<T, S> {
    inner: Arc<Inner<T, S>>,
}

impl<T, S> PartialEq for AppContext<T, S> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, S> Clone for AppContext<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: KeyValueStore> AppContext<HttpTransport, S> {
    /// Build a context talking to `config.api.base_url` over HTTP.
    pub fn connect(config: ClientConfig, storage: S) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config.api.base_url.clone())?;
        Ok(Self::new(config, transport, storage))
    }
}

impl<T: Transport, S: KeyValueStore> AppContext<T, S> {
    pub fn new(config: ClientConfig, transport: T, storage: S) -> Self {
        let remote = RemoteClient::new(transport, CredentialStore::new());
        let client = ReauthClient::new(remote, config.auth.max_renewals);
        Self {
            inner: Arc::new(Inner {
                config,
                client,
                persist: PersistPreference::new(storage),
                bootstrap: SessionBootstrap::new(),
                notes: EntityCache::new(),
                users: EntityCache::new(),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ReauthClient<T> {
        &self.inner.client
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.inner.client.credentials()
    }

    pub fn persist(&self) -> &PersistPreference<S> {
        &self.inner.persist
    }

    pub fn notes(&self) -> Resource<'_, Note, T> {
        Resource::new(&self.inner.client, &self.inner.notes)
    }

    pub fn users(&self) -> Resource<'_, User, T> {
        Resource::new(&self.inner.client, &self.inner.users)
    }

    /// Identity carried by the current access token.
    pub fn auth(&self) -> AuthInfo {
        let Some(token) = self.credentials().get() else {
            return AuthInfo::anonymous();
        };
        AuthInfo::from_token(&token).unwrap_or_else(|error| {
            tracing::warn!(%error, "could not decode access token");
            AuthInfo::anonymous()
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthInfo, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = self
            .inner
            .client
            .remote()
            .call(&ApiRequest::post(LOGIN_PATH, serde_json::to_value(&request)?))
            .await?;
        let AccessToken { access_token } = serde_json::from_value(body)?;
        let auth = AuthInfo::from_token(&access_token)?;
        self.credentials().set(access_token);
        self.inner.bootstrap.on_login();
        tracing::info!(username = %auth.username, "logged in");
        Ok(auth)
    }

    /// Ask the server to drop the refresh cookie, then forget the token and
    /// every cached collection. Nothing is cleared if the server refuses.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.inner
            .client
            .remote()
            .call(&ApiRequest {
                method: Method::Post,
                path: LOGOUT_PATH.to_string(),
                body: None,
            })
            .await?;
        self.credentials().clear();
        self.inner.notes.reset();
        self.inner.users.reset();
        tracing::info!("logged out");
        Ok(())
    }

    /// Run the load-time session restore. Safe to call from every protected view.
    pub async fn restore_session(&self) -> BootstrapState {
        let persist = self.inner.persist.get();
        self.inner.bootstrap.run(&self.inner.client, persist).await
    }

    pub fn gate(&self) -> Gate {
        self.inner
            .bootstrap
            .gate(self.inner.persist.get(), self.credentials().is_present())
    }

    /// Force a fetch of both collections.
    pub async fn prefetch_all(&self) {
        self.notes().prefetch(true).await;
        self.users().prefetch(true).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::encode_token;
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use store::{MemoryStore, QueryStatus, Role};

    fn context(transport: &ScriptedTransport) -> AppContext<ScriptedTransport, MemoryStore> {
        AppContext::new(ClientConfig::default(), transport.clone(), MemoryStore::new())
    }

    #[tokio::test]
    async fn test_login_stores_token_and_decodes_roles() {
        let transport = ScriptedTransport::new();
        let token = encode_token("carol", &["Employee", "Manager"]);
        transport.reply("POST /auth", 200, json!({ "accessToken": token }));
        let app = context(&transport);

        let auth = app.login("carol", "secret").await.unwrap();
        assert_eq!(auth.username, "carol");
        assert_eq!(auth.status, Role::Manager);
        assert_eq!(app.auth(), auth);
        assert_eq!(app.credentials().get(), Some(token));

        let sent = transport.last("POST /auth").unwrap().body.unwrap();
        assert_eq!(sent, json!({ "username": "carol", "password": "secret" }));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_anonymous() {
        let transport = ScriptedTransport::new();
        transport.reply("POST /auth", 401, json!({ "message": "Unauthorized" }));
        let app = context(&transport);

        let error = app.login("carol", "wrong").await.unwrap_err();
        assert_eq!(error.login_message(), "Unauthorized");
        assert!(!app.credentials().is_present());
        assert!(!app.auth().is_authenticated());
        assert_eq!(transport.count("GET /auth/refresh"), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_token_and_caches() {
        let transport = ScriptedTransport::new();
        transport.reply("POST /auth", 200, json!({ "accessToken": encode_token("alice", &["Employee"]) }));
        transport.reply("GET /notes", 200, json!([{ "_id": "n1", "username": "alice" }]));
        transport.reply("GET /users", 200, json!([{ "_id": "u1", "username": "alice" }]));
        transport.reply("POST /auth/logout", 204, serde_json::Value::Null);
        transport.reply("GET /notes", 401, json!({ "message": "Unauthorized" }));
        let app = context(&transport);

        app.login("alice", "pw").await.unwrap();
        app.prefetch_all().await;
        assert_eq!(app.notes().cache().select_ids().len(), 1);

        app.logout().await.unwrap();
        assert_eq!(transport.last("POST /auth/logout").unwrap().body, None);
        assert!(!app.credentials().is_present());
        assert_eq!(app.notes().cache().snapshot().status, QueryStatus::Uninitialized);
        assert!(app.users().cache().data().is_none());

        app.notes().refetch().await;
        assert_eq!(transport.last("GET /notes").unwrap().bearer, None);
    }

    #[tokio::test]
    async fn test_logout_failure_keeps_session() {
        let transport = ScriptedTransport::new();
        transport.reply("POST /auth", 200, json!({ "accessToken": encode_token("alice", &["Employee"]) }));
        transport.fail("POST /auth/logout", ApiError::NoResponse("offline".into()));
        let app = context(&transport);

        app.login("alice", "pw").await.unwrap();
        assert!(app.logout().await.is_err());
        assert!(app.credentials().is_present());
    }

    #[tokio::test]
    async fn test_trusted_device_restores_session() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /auth/refresh", 200, json!({ "accessToken": encode_token("alice", &["Employee"]) }));
        let app = context(&transport);
        app.persist().set(true).unwrap();

        assert_eq!(app.gate(), Gate::Pending);
        assert_eq!(app.restore_session().await, BootstrapState::Restored);
        assert_eq!(app.gate(), Gate::Open);
        assert_eq!(app.auth().username, "alice");
    }

    #[tokio::test]
    async fn test_gate_stays_open_after_login_then_logout() {
        let transport = ScriptedTransport::new();
        transport.reply("POST /auth", 200, json!({ "accessToken": encode_token("alice", &["Employee"]) }));
        transport.reply("POST /auth/logout", 204, serde_json::Value::Null);
        let app = context(&transport);
        app.persist().set(true).unwrap();

        app.login("alice", "pw").await.unwrap();
        assert_eq!(app.restore_session().await, BootstrapState::Authenticated);
        assert_eq!(app.gate(), Gate::Open);

        app.logout().await.unwrap();
        assert_eq!(app.restore_session().await, BootstrapState::Authenticated);
        assert_eq!(app.gate(), Gate::Open);
        assert!(!app.auth().is_authenticated());
        assert_eq!(transport.count("GET /auth/refresh"), 0);
    }

    #[tokio::test]
    async fn test_untrusted_device_skips_restore() {
        let transport = ScriptedTransport::new();
        let app = context(&transport);

        assert_eq!(app.gate(), Gate::Open);
        assert_eq!(app.restore_session().await, BootstrapState::Skipped);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_after_failed_restore_opens_gate() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /auth/refresh", 403, json!({ "message": "Forbidden" }));
        transport.reply("POST /auth", 200, json!({ "accessToken": encode_token("alice", &["Employee"]) }));
        let app = context(&transport);
        app.persist().set(true).unwrap();

        app.restore_session().await;
        assert!(matches!(app.gate(), Gate::Denied(_)));

        app.login("alice", "pw").await.unwrap();
        assert_eq!(app.gate(), Gate::Open);
    }
}
