//! # "Trust this device" preference
//!
//! A durable boolean stored under the key [`PERSIST_KEY`] as JSON text
//! (`"true"` / `"false"`). When it is set, the client tries to restore the
//! session silently on the next load. It is never tied to a credential: the
//! access token itself is not written anywhere.
//!
//! Storage goes through [`KeyValueStore`], implemented by
//! [`MemoryStore`](crate::MemoryStore), [`FileStore`](crate::FileStore) on
//! native targets, and `LocalStorage` in the browser.

use crate::error::StoreError;

/// Storage key of the preference.
pub const PERSIST_KEY: &str = "persist";

/// Minimal synchronous string store, shaped like the browser's `localStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// The persistence preference flag backed by a [`KeyValueStore`].
#[derive(Clone, Debug)]
pub struct PersistPreference<S> {
    storage: S,
}

impl<S: KeyValueStore> PersistPreference<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Current value. Missing, unreadable or non-boolean content reads as `false`.
    pub fn get(&self) -> bool {
        match self.storage.get_item(PERSIST_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|_| {
                tracing::warn!(%raw, "ignoring malformed persist preference");
                false
            }),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persist preference");
                false
            }
        }
    }

    pub fn set(&self, persist: bool) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&persist)?;
        self.storage.set_item(PERSIST_KEY, &raw)
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> Result<bool, StoreError> {
        let next = !self.get();
        self.set(next)?;
        Ok(next)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_defaults_to_false() {
        let pref = PersistPreference::new(MemoryStore::new());
        assert!(!pref.get());
    }

    #[test]
    fn test_stored_as_json_text() {
        let store = MemoryStore::new();
        let pref = PersistPreference::new(store.clone());

        pref.set(true).unwrap();
        assert_eq!(store.get_item(PERSIST_KEY).unwrap().as_deref(), Some("true"));
        assert!(pref.get());

        assert!(!pref.toggle().unwrap());
        assert_eq!(store.get_item(PERSIST_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_garbage_reads_as_false() {
        let store = MemoryStore::new();
        store.set_item(PERSIST_KEY, "null").unwrap();
        assert!(!PersistPreference::new(store.clone()).get());

        store.set_item(PERSIST_KEY, "{not json").unwrap();
        assert!(!PersistPreference::new(store).get());
    }
}
