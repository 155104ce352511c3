//! Employee login page with the "Trust This Device" toggle.

use dioxus::prelude::*;
use ui::{use_app, use_auth, ErrorMessage, Loading};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let app = use_app();
    let mut auth = use_auth();
    let nav = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut err_msg = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut persist = use_signal({
        let app = app.clone();
        move || app.persist().get()
    });

    let handle_toggle = {
        let app = app.clone();
        move |_| match app.persist().toggle() {
            Ok(next) => persist.set(next),
            Err(e) => tracing::error!(error = %e, "failed to save persist preference"),
        }
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let app = app.clone();
        async move {
            loading.set(true);
            match app.login(&username(), &password()).await {
                Ok(info) => {
                    auth.set(info);
                    username.set(String::new());
                    password.set(String::new());
                    loading.set(false);
                    nav.push(Route::Welcome {});
                }
                Err(e) => {
                    tracing::error!(error = %e, "login failed");
                    err_msg.set(e.login_message());
                    loading.set(false);
                }
            }
        }
    };

    if loading() {
        return rsx! { Loading {} };
    }

    rsx! {
        section {
            class: "public",
            header {
                h1 { "Employee Login" }
            }
            main {
                class: "login",
                if !err_msg().is_empty() {
                    ErrorMessage { message: err_msg() }
                }
                form {
                    class: "form",
                    onsubmit: handle_submit,
                    label { r#for: "username", "Username:" }
                    input {
                        class: "form__input",
                        r#type: "text",
                        id: "username",
                        autofocus: true,
                        autocomplete: "off",
                        required: true,
                        value: username(),
                        oninput: move |evt: FormEvent| {
                            username.set(evt.value());
                            err_msg.set(String::new());
                        },
                    }
                    label { r#for: "password", "Password:" }
                    input {
                        class: "form__input",
                        r#type: "password",
                        id: "password",
                        autocomplete: "off",
                        required: true,
                        value: password(),
                        oninput: move |evt: FormEvent| {
                            password.set(evt.value());
                            err_msg.set(String::new());
                        },
                    }
                    button { class: "form__submit-button", r#type: "submit", "Login" }
                    label {
                        class: "form__persist",
                        r#for: "persist",
                        input {
                            class: "form__checkbox",
                            r#type: "checkbox",
                            id: "persist",
                            checked: persist(),
                            onchange: handle_toggle,
                        }
                        "Trust This Device"
                    }
                }
            }
            footer {
                Link { to: Route::Public {}, "Back to Home" }
            }
        }
    }
}
