//! In-memory access token store.

use std::sync::{Arc, PoisonError, RwLock};

/// Holds the short-lived access token for the lifetime of the running app.
///
/// Never serialized or written to durable storage. Clones share the token.
#[derive(Clone, Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_present(&self) -> bool {
        self.token.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_present() { "<redacted>" } else { "<none>" };
        f.debug_struct("CredentialStore").field("token", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let store = CredentialStore::new();
        assert!(store.get().is_none());

        let shared = store.clone();
        shared.set("token-1");
        assert_eq!(store.get().as_deref(), Some("token-1"));

        store.clear();
        assert!(!shared.is_present());
    }

    #[test]
    fn test_debug_never_prints_token() {
        let store = CredentialStore::new();
        store.set("secret-token");
        assert!(!format!("{store:?}").contains("secret-token"));
    }
}
