//! This crate contains all shared UI for the workspace: the client context,
//! collection hooks, route guards and status components.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod platform;
pub use platform::{connect, platform_store, sleep, PlatformStore, TechNotes};

mod provider;
pub use provider::{use_app, use_auth, TechNotesProvider};

mod collection;
pub use collection::{use_collection, use_notes, use_users, SelectResource, Snapshot};

mod session;
pub use session::{RequireRoles, SessionGate, LOGIN_PATH};

mod status;
pub use status::{ErrorMessage, Loading};

pub const STYLES: &str = include_str!("styles.css");
