//! Role checks shared by the views.

use store::{EntityCollection, Note, Role};

use crate::auth::AuthInfo;

pub const NOT_AUTHORIZED_TO_EDIT: &str = "You are not authorized to edit this note.";

/// Roles allowed into the users section.
pub const USER_ADMIN_ROLES: [Role; 2] = [Role::Manager, Role::Admin];

fn sees_everything(auth: &AuthInfo) -> bool {
    auth.is_manager || auth.is_admin
}

/// Note ids the current user may see, in collection order.
pub fn visible_note_ids(notes: &EntityCollection<Note>, auth: &AuthInfo) -> Vec<String> {
    if sees_everything(auth) {
        return notes.ids().to_vec();
    }
    notes
        .iter()
        .filter(|note| owns(note, auth))
        .map(|note| note.id.clone())
        .collect()
}

pub fn can_edit_note(note: &Note, auth: &AuthInfo) -> bool {
    sees_everything(auth) || owns(note, auth)
}

fn owns(note: &Note, auth: &AuthInfo) -> bool {
    auth.is_authenticated() && note.username == auth.username
}

/// Only managers and admins may delete notes.
pub fn can_delete_note(auth: &AuthInfo) -> bool {
    sees_everything(auth)
}

pub fn can_manage_users(auth: &AuthInfo) -> bool {
    auth.has_any_role(&USER_ADMIN_ROLES)
}
