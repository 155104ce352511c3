//! Platform plumbing: where the preference lives, how the client is built,
//! and how to wait.
//!
//! - **Web** (WASM + `web` feature): `localStorage` via [`store::LocalStorage`]
//! - **Desktop / Mobile** (native): one file per key under `<data_dir>/technotes/`

use std::time::Duration;

use api::{ApiError, AppContext, ClientConfig, HttpTransport};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStorage;
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type PlatformStore = store::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = store::FileStore;

/// The client handle every view works with.
pub type TechNotes = AppContext<HttpTransport, PlatformStore>;

pub fn platform_store() -> PlatformStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorage::new()
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        store::MemoryStore::new()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("technotes");
        store::FileStore::new(base)
    }
}

pub fn load_config() -> ClientConfig {
    #[cfg(not(target_arch = "wasm32"))]
    {
        ClientConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default client config");
            ClientConfig::default()
        })
    }
    #[cfg(target_arch = "wasm32")]
    {
        ClientConfig::default()
    }
}

pub fn connect() -> Result<TechNotes, ApiError> {
    let config = load_config();
    tracing::info!(base_url = %config.api.base_url, "connecting to techNotes API");
    AppContext::connect(config, platform_store())
}

pub async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Whether the browser window currently has focus. Always true on native.
pub fn window_has_focus() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.has_focus().ok())
            .unwrap_or(true)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        true
    }
}
