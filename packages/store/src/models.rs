//! # Domain records for notes and users
//!
//! Wire-compatible with the techNotes REST API. Records are read from
//! `GET /notes` and `GET /users`; the write payloads ([`NewNote`],
//! [`NoteUpdate`], [`NewUser`], [`UserUpdate`]) are the JSON bodies of the
//! `POST` and `PATCH` calls on the same paths.
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Note`] | A ticket-style note. `user` is the owner's id, `username` the owner's name as joined in by the server. |
//! | [`User`] | An employee account. The password is write-only and never part of this record. |
//! | [`Role`] | One of `Employee`, `Manager`, `Admin`. |
//!
//! Both records implement [`Entity`], which is how the normalized cache
//! learns their id, their REST path and their write payload types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

/// Role names as stored on the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Manager, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A note as returned by `GET /notes`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    /// Owner's user id.
    pub user: String,
    /// Owner's username.
    pub username: String,
    pub title: String,
    pub text: String,
    pub completed: bool,
    /// Server-assigned sequence number.
    pub ticket: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /notes`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewNote {
    pub user: String,
    pub title: String,
    pub text: String,
}

/// Body of `PATCH /notes`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoteUpdate {
    pub id: String,
    pub user: String,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

impl Entity for Note {
    const KIND: EntityKind = EntityKind::Note;
    type Draft = NewNote;
    type Patch = NoteUpdate;

    fn id(&self) -> &str {
        &self.id
    }

    fn patch_id(patch: &NoteUpdate) -> &str {
        &patch.id
    }
}

/// A user account as returned by `GET /users`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub username: String,
    pub roles: BTreeSet<Role>,
    pub active: bool,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: String::new(),
            username: String::new(),
            roles: BTreeSet::from([Role::Employee]),
            active: true,
        }
    }
}

impl User {
    /// Comma separated role list for table cells.
    pub fn roles_label(&self) -> String {
        self.roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Body of `POST /users`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub roles: Vec<Role>,
}

/// Body of `PATCH /users`. The password is only sent when it changes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserUpdate {
    pub id: String,
    pub username: String,
    pub roles: Vec<Role>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    type Draft = NewUser;
    type Patch = UserUpdate;

    fn id(&self) -> &str {
        &self.id
    }

    fn patch_id(patch: &UserUpdate) -> &str {
        &patch.id
    }
}
