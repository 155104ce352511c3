//! # Filesystem-backed key-value store
//!
//! [`FileStore`] keeps each key in its own file under a base directory. It is
//! the native stand-in for the browser's `localStorage`, so desktop builds
//! remember the "trust this device" choice across restarts.
//!
//! ```text
//! <base_dir>/
//! └── persist        # contains "true" or "false"
//! ```

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::persist::KeyValueStore;

#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.item_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::write(self.item_path(key), value)?;
        Ok(())
    }
}
