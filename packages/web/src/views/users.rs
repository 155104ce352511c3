use dioxus::prelude::*;
use store::User;
use ui::icons::FaPenToSquare;
use ui::{use_users, ErrorMessage, Icon, Loading};

use crate::Route;

#[component]
pub fn UsersList() -> Element {
    let users = use_users();

    let content = if users.is_loading() {
        rsx! { Loading {} }
    } else if let (true, Some(error)) = (users.is_error(), &users.error) {
        rsx! { ErrorMessage { message: error.to_string() } }
    } else if let Some(data) = &users.data {
        rsx! {
            table {
                class: "table table--users",
                thead {
                    class: "table__thead",
                    tr {
                        th { scope: "col", class: "table__th user__username", "Username" }
                        th { scope: "col", class: "table__th user__roles", "Roles" }
                        th { scope: "col", class: "table__th user__edit", "Edit" }
                    }
                }
                tbody {
                    for user in data.iter() {
                        UserRow { key: "{user.id}", user: user.clone() }
                    }
                }
            }
        }
    } else {
        rsx! {}
    };

    rsx! {
        section {
            h1 { "Users" }
            {content}
        }
    }
}

#[component]
fn UserRow(user: User) -> Element {
    let nav = use_navigator();
    let id = user.id.clone();
    let cell = if user.active {
        "table__cell"
    } else {
        "table__cell table__cell--inactive"
    };

    rsx! {
        tr {
            class: "table__row user",
            td { class: "{cell}", "{user.username}" }
            td { class: "{cell}", {user.roles_label()} }
            td { class: "{cell}",
                button {
                    class: "icon-button table__button",
                    title: "Edit",
                    onclick: move |_| {
                        nav.push(Route::EditUser { id: id.clone() });
                    },
                    Icon { icon: FaPenToSquare, width: 20, height: 20 }
                }
            }
        }
    }
}
