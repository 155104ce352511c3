use api::AuthInfo;
use dioxus::prelude::*;
use ui::icons::{FaFileCirclePlus, FaFilePen, FaHouse, FaRightFromBracket, FaUserGear, FaUserPlus};
use ui::{use_app, use_auth, ErrorMessage, Icon};

use crate::Route;

#[component]
pub fn DashHeader() -> Element {
    let app = use_app();
    let mut auth = use_auth();
    let nav = use_navigator();
    let route = use_route::<Route>();
    let mut logging_out = use_signal(|| false);
    let mut logout_error = use_signal(|| Option::<String>::None);

    let on_dash = matches!(route, Route::Welcome {});
    let on_notes = matches!(route, Route::NotesList {});
    let on_users = matches!(route, Route::UsersList {});
    let container_class = if on_dash || on_notes || on_users {
        "dash-header__container"
    } else {
        "dash-header__container dash-header__container--small"
    };
    let can_manage = api::access::can_manage_users(&auth.read());

    let log_out = move |_| {
        let app = app.clone();
        async move {
            logging_out.set(true);
            logout_error.set(None);
            let result = app.logout().await;
            logging_out.set(false);
            match result {
                Ok(()) => {
                    auth.set(AuthInfo::anonymous());
                    nav.replace(Route::Public {});
                }
                Err(e) => {
                    tracing::error!(error = %e, "logout failed");
                    logout_error.set(Some(e.to_string()));
                }
            }
        }
    };

    rsx! {
        if let Some(message) = logout_error() {
            ErrorMessage { message }
        }
        header {
            class: "dash-header",
            div {
                class: "{container_class}",
                Link {
                    to: Route::Welcome {},
                    h1 { class: "dash-header__title", "techNotes" }
                }
                nav {
                    class: "dash-header__nav",
                    if logging_out() {
                        p { "Logging out" }
                    } else {
                        if on_notes {
                            button {
                                class: "icon-button",
                                title: "New Note",
                                onclick: move |_| {
                                    nav.push(Route::NewNote {});
                                },
                                Icon { icon: FaFileCirclePlus, width: 28, height: 28 }
                            }
                        }
                        if on_users {
                            button {
                                class: "icon-button",
                                title: "New User",
                                onclick: move |_| {
                                    nav.push(Route::NewUser {});
                                },
                                Icon { icon: FaUserPlus, width: 28, height: 28 }
                            }
                        }
                        if can_manage && !on_users {
                            button {
                                class: "icon-button",
                                title: "Users",
                                onclick: move |_| {
                                    nav.push(Route::UsersList {});
                                },
                                Icon { icon: FaUserGear, width: 28, height: 28 }
                            }
                        }
                        if !on_notes {
                            button {
                                class: "icon-button",
                                title: "Notes",
                                onclick: move |_| {
                                    nav.push(Route::NotesList {});
                                },
                                Icon { icon: FaFilePen, width: 28, height: 28 }
                            }
                        }
                        button {
                            class: "icon-button",
                            title: "Logout",
                            onclick: log_out,
                            Icon { icon: FaRightFromBracket, width: 28, height: 28 }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn DashFooter() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let route = use_route::<Route>();
    let info = auth.read().clone();

    rsx! {
        footer {
            class: "dash-footer",
            if !matches!(route, Route::Welcome {}) {
                button {
                    class: "dash-footer__button icon-button",
                    title: "Home",
                    onclick: move |_| {
                        nav.push(Route::Welcome {});
                    },
                    Icon { icon: FaHouse, width: 24, height: 24 }
                }
            }
            p { "Current User: {info.username}" }
            p { "Status: {info.status}" }
        }
    }
}
