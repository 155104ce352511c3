//! Client context and hooks for the UI.

use api::AuthInfo;
use dioxus::prelude::*;

use crate::platform::{self, TechNotes};
use crate::status::ErrorMessage;

#[cfg(target_arch = "wasm32")]
const FOCUS_CHECK: std::time::Duration = std::time::Duration::from_secs(1);

/// The shared client handle.
pub fn use_app() -> TechNotes {
    use_context::<TechNotes>()
}

/// Identity of the logged-in user. Updated on login, logout and session restore.
pub fn use_auth() -> Signal<AuthInfo> {
    use_context::<Signal<AuthInfo>>()
}

/// Builds the client once and provides it, together with the auth signal,
/// to everything below.
#[component]
pub fn TechNotesProvider(children: Element) -> Element {
    let app = use_hook(|| platform::connect().map_err(|e| e.to_string()));

    match app {
        Ok(app) => rsx! {
            Connected { app, {children} }
        },
        Err(message) => {
            tracing::error!(%message, "failed to build API client");
            rsx! {
                ErrorMessage { message }
            }
        }
    }
}

#[component]
fn Connected(app: TechNotes, children: Element) -> Element {
    let app = use_context_provider(|| app);
    use_context_provider(|| Signal::new(app.auth()));

    #[cfg(target_arch = "wasm32")]
    use_future(move || watch_focus(app.clone()));

    rsx! {
        {children}
    }
}

/// Refetch focus-enabled collections whenever the window comes back into focus.
#[cfg(target_arch = "wasm32")]
async fn watch_focus(app: TechNotes) {
    let mut focused = platform::window_has_focus();
    loop {
        platform::sleep(FOCUS_CHECK).await;
        let now = platform::window_has_focus();
        if now && !focused {
            tracing::debug!("window regained focus");
            app.notes().on_focus().await;
            app.users().on_focus().await;
        }
        focused = now;
    }
}
