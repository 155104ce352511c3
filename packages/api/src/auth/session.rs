//! # Session bootstrap
//!
//! Runs once per application load, before protected views render:
//!
//! ```text
//! Idle ──persist off──────────────▶ Skipped
//!  │ ──token already in memory───▶ Authenticated
//!  └──persist on, no token──▶ Restoring ──refresh ok──▶ Restored
//!                                       └─refresh err─▶ Failed
//! ```
//!
//! The restore request is guarded by a `OnceCell`, so any number of protected
//! routes (even mounting concurrently) share a single `GET /auth/refresh`.
//! Every path through the cell ends in a terminal state, so a later logout
//! leaves the gate open and the role guards send the user to the login page.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use crate::auth::ReauthClient;
use crate::error::ApiError;
use crate::transport::Transport;

#[derive(Clone, Debug, PartialEq)]
pub enum BootstrapState {
    Idle,
    Restoring,
    Restored,
    /// A token was already in memory when the bootstrap ran.
    Authenticated,
    Failed(ApiError),
    Skipped,
}

/// What a protected route should do right now.
#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    Open,
    Pending,
    /// Restore failed; carries the message to show next to a login link.
    Denied(String),
}

#[derive(Debug)]
pub struct SessionBootstrap {
    state: Mutex<BootstrapState>,
    started: OnceCell<()>,
}

impl Default for SessionBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBootstrap {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BootstrapState::Idle),
            started: OnceCell::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BootstrapState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, next: BootstrapState) {
        tracing::info!(state = ?next, "session bootstrap");
        *self.lock() = next;
    }

    pub fn state(&self) -> BootstrapState {
        self.lock().clone()
    }

    pub fn gate(&self, persist: bool, has_credential: bool) -> Gate {
        match &*self.lock() {
            BootstrapState::Skipped
            | BootstrapState::Restored
            | BootstrapState::Authenticated => Gate::Open,
            BootstrapState::Restoring => Gate::Pending,
            BootstrapState::Failed(error) => Gate::Denied(error.to_string()),
            BootstrapState::Idle if !persist || has_credential => Gate::Open,
            BootstrapState::Idle => Gate::Pending,
        }
    }

    /// Decide and, if needed, restore the session. Later calls wait for the
    /// first one and never touch the network.
    pub async fn run<T: Transport>(&self, client: &ReauthClient<T>, persist: bool) -> BootstrapState {
        self.started
            .get_or_init(|| async {
                if !persist {
                    self.transition(BootstrapState::Skipped);
                    return;
                }
                if client.credentials().is_present() {
                    tracing::debug!("access token already present, no restore needed");
                    self.transition(BootstrapState::Authenticated);
                    return;
                }
                self.transition(BootstrapState::Restoring);
                match client.refresh().await {
                    Ok(_) => self.transition(BootstrapState::Restored),
                    Err(error) => self.transition(BootstrapState::Failed(error.into_session_expired())),
                }
            })
            .await;
        self.state()
    }

    /// A manual login supersedes a failed restore.
    pub fn on_login(&self) {
        let mut state = self.lock();
        if matches!(*state, BootstrapState::Failed(_)) {
            *state = BootstrapState::Restored;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialStore;
    use crate::error::SESSION_EXPIRED_MESSAGE;
    use crate::remote::RemoteClient;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    fn client(transport: &ScriptedTransport) -> ReauthClient<ScriptedTransport> {
        ReauthClient::new(RemoteClient::new(transport.clone(), CredentialStore::new()), 1)
    }

    #[tokio::test]
    async fn test_persist_off_skips_without_network() {
        let transport = ScriptedTransport::new();
        let bootstrap = SessionBootstrap::new();
        assert_eq!(bootstrap.gate(false, false), Gate::Open);

        let state = bootstrap.run(&client(&transport), false).await;
        assert_eq!(state, BootstrapState::Skipped);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_restores_once_for_concurrent_mounts() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /auth/refresh", 200, json!({ "accessToken": "restored" }));
        let client = client(&transport);
        let bootstrap = SessionBootstrap::new();
        assert_eq!(bootstrap.gate(true, false), Gate::Pending);

        let (a, b, c) = tokio::join!(
            bootstrap.run(&client, true),
            bootstrap.run(&client, true),
            bootstrap.run(&client, true),
        );
        assert_eq!(a, BootstrapState::Restored);
        assert_eq!(b, BootstrapState::Restored);
        assert_eq!(c, BootstrapState::Restored);

        bootstrap.run(&client, true).await;
        assert_eq!(transport.count("GET /auth/refresh"), 1);
        assert_eq!(client.credentials().get().as_deref(), Some("restored"));
        assert_eq!(bootstrap.gate(true, true), Gate::Open);
    }

    #[tokio::test]
    async fn test_existing_token_unlocks_without_refresh() {
        let transport = ScriptedTransport::new();
        let client = client(&transport);
        client.credentials().set("from-login");
        let bootstrap = SessionBootstrap::new();

        assert_eq!(bootstrap.gate(true, true), Gate::Open);
        assert_eq!(bootstrap.run(&client, true).await, BootstrapState::Authenticated);
        assert!(transport.calls().is_empty());

        client.credentials().clear();
        assert_eq!(bootstrap.gate(true, false), Gate::Open);
    }

    #[tokio::test]
    async fn test_failed_restore_denies_until_login() {
        let transport = ScriptedTransport::new();
        transport.reply("GET /auth/refresh", 403, json!({ "message": "Forbidden" }));
        let client = client(&transport);
        let bootstrap = SessionBootstrap::new();

        let state = bootstrap.run(&client, true).await;
        assert!(matches!(state, BootstrapState::Failed(_)));
        assert_eq!(bootstrap.gate(true, false), Gate::Denied(SESSION_EXPIRED_MESSAGE.to_string()));

        // no second attempt in the same load
        bootstrap.run(&client, true).await;
        assert_eq!(transport.count("GET /auth/refresh"), 1);

        bootstrap.on_login();
        assert_eq!(bootstrap.gate(true, true), Gate::Open);
    }

    #[tokio::test]
    async fn test_offline_restore_keeps_no_response_message() {
        let transport = ScriptedTransport::new();
        transport.fail("GET /auth/refresh", ApiError::NoResponse("connection refused".into()));
        let bootstrap = SessionBootstrap::new();

        bootstrap.run(&client(&transport), true).await;
        assert_eq!(bootstrap.gate(true, false), Gate::Denied("No server response".into()));
    }
}
