//! Layout routes that wrap the dashboard.

use api::access::USER_ADMIN_ROLES;
use dioxus::prelude::*;
use store::Role;
use ui::{use_app, RequireRoles, SessionGate};

use super::{DashFooter, DashHeader};
use crate::Route;

#[component]
pub fn PersistLogin() -> Element {
    rsx! {
        SessionGate {
            Outlet::<Route> {}
        }
    }
}

/// Any role may enter the dashboard.
#[component]
pub fn RequireAuth() -> Element {
    rsx! {
        RequireRoles {
            allowed: Role::ALL.to_vec(),
            Outlet::<Route> {}
        }
    }
}

#[component]
pub fn RequireManager() -> Element {
    rsx! {
        RequireRoles {
            allowed: USER_ADMIN_ROLES.to_vec(),
            Outlet::<Route> {}
        }
    }
}

/// Loads both collections as soon as the dashboard mounts.
#[component]
pub fn Prefetch() -> Element {
    let app = use_app();
    use_hook(move || {
        spawn(async move {
            tracing::debug!("prefetching notes and users");
            app.prefetch_all().await;
        });
    });

    rsx! {
        Outlet::<Route> {}
    }
}

#[component]
pub fn DashLayout() -> Element {
    rsx! {
        DashHeader {}
        div {
            class: "dash-container",
            Outlet::<Route> {}
        }
        DashFooter {}
    }
}
