//! # Browser `localStorage` backend
//!
//! [`LocalStorage`] is the [`KeyValueStore`] used on the **web platform**. It is
//! a zero-size handle that looks up `window.localStorage` on every call, so it
//! is `Clone`/`Copy`-friendly and never holds a JS reference across awaits.
//!
//! A browser with storage disabled (private mode, blocked third-party storage)
//! surfaces as [`StoreError::Unavailable`]; the persistence flag then reads as
//! `false`.

use wasm_bindgen::JsValue;

use crate::error::StoreError;
use crate::persist::KeyValueStore;

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))
    }
}

fn js_error(value: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{value:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }
}
