use dioxus::prelude::*;
use ui::use_auth;

use crate::Route;

#[component]
pub fn Welcome() -> Element {
    let auth = use_auth();
    let info = auth.read().clone();
    let can_manage = api::access::can_manage_users(&info);

    rsx! {
        section {
            class: "welcome",
            h1 { "Welcome {info.username}!" }
            p { Link { to: Route::NotesList {}, "View techNotes" } }
            p { Link { to: Route::NewNote {}, "Add New techNote" } }
            if can_manage {
                p { Link { to: Route::UsersList {}, "View User Settings" } }
                p { Link { to: Route::NewUser {}, "Add New User" } }
            }
        }
    }
}
