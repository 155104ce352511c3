//! Route guards around the protected part of the app.

use api::Gate;
use dioxus::prelude::*;
use store::Role;

use crate::provider::{use_app, use_auth};
use crate::status::Loading;

pub const LOGIN_PATH: &str = "/login";

/// Restores a trusted session before rendering its children.
///
/// The restore runs at most once per load no matter how many times the
/// guard mounts. Children render right away when the device is not trusted
/// or a token is already in memory.
#[component]
pub fn SessionGate(children: Element) -> Element {
    let app = use_app();
    let mut auth = use_auth();

    let restore = use_resource({
        let app = app.clone();
        move || {
            let app = app.clone();
            async move {
                let state = app.restore_session().await;
                auth.set(app.auth());
                state
            }
        }
    });
    // re-render once the restore settles
    let _ = restore.read();

    match app.gate() {
        Gate::Open => children,
        Gate::Pending => rsx! { Loading {} },
        Gate::Denied(message) => rsx! {
            p {
                class: "errmsg",
                "{message} "
                Link { to: LOGIN_PATH, "Please login again" }
            }
        },
    }
}

/// Renders its children only for users holding one of `allowed`;
/// everyone else is sent to the login page.
#[component]
pub fn RequireRoles(allowed: Vec<Role>, children: Element) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    if auth.read().has_any_role(&allowed) {
        return children;
    }
    tracing::debug!(?allowed, "role check failed, redirecting to login");
    nav.replace(LOGIN_PATH);
    rsx! {}
}
