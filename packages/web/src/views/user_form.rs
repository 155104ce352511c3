//! New-user and edit-user forms.

use std::collections::BTreeSet;

use api::forms::{valid_password, valid_username};
use dioxus::prelude::*;
use store::{NewUser as UserDraft, Role, SubscriptionOptions, User, UserUpdate};
use ui::icons::{FaFloppyDisk, FaTrashCan};
use ui::{use_app, use_collection, ErrorMessage, Icon, Loading, TechNotes};

use crate::Route;

fn incomplete(base: &str, valid: bool) -> String {
    if valid {
        base.to_string()
    } else {
        format!("{base} form__input--incomplete")
    }
}

#[component]
fn RolePicker(mut selected: Signal<BTreeSet<Role>>) -> Element {
    let class = incomplete("form__select", !selected.read().is_empty());
    rsx! {
        label { class: "form__label", "ASSIGNED ROLES:" }
        div {
            class: "{class}",
            for role in Role::ALL {
                label {
                    class: "form__checkbox-container",
                    input {
                        class: "form__checkbox",
                        r#type: "checkbox",
                        checked: selected.read().contains(&role),
                        onchange: move |_| {
                            let mut roles = selected.write();
                            if !roles.remove(&role) {
                                roles.insert(role);
                            }
                        },
                    }
                    "{role}"
                }
            }
        }
    }
}

#[component]
pub fn NewUser() -> Element {
    let app = use_app();
    let nav = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let roles = use_signal(|| BTreeSet::from([Role::Employee]));
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let valid_name = valid_username(&username());
    let valid_pass = valid_password(&password());
    let can_save = !roles.read().is_empty() && valid_name && valid_pass && !saving();

    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        let app = app.clone();
        let draft = UserDraft {
            username: username(),
            password: password(),
            roles: roles.read().iter().copied().collect(),
        };
        async move {
            if !can_save {
                return;
            }
            saving.set(true);
            let result = app.users().create(&draft).await;
            saving.set(false);
            match result {
                Ok(_) => {
                    username.set(String::new());
                    password.set(String::new());
                    nav.replace(Route::UsersList {});
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to create user");
                    error.set(Some(e.to_string()));
                }
            }
        }
    };

    rsx! {
        if let Some(message) = error() {
            ErrorMessage { message }
        }
        form {
            class: "form",
            onsubmit: on_save,
            div {
                class: "form__title-row",
                h2 { "New User" }
                div {
                    class: "form__action-buttons",
                    button {
                        class: "icon-button",
                        title: "Save",
                        r#type: "submit",
                        disabled: !can_save,
                        Icon { icon: FaFloppyDisk, width: 28, height: 28 }
                    }
                }
            }
            label {
                class: "form__label",
                r#for: "username",
                "Username: "
                span { class: "nowrap", "[3-20 letters]" }
            }
            input {
                class: incomplete("form__input", valid_name),
                id: "username",
                name: "username",
                r#type: "text",
                autocomplete: "off",
                value: username(),
                oninput: move |evt: FormEvent| username.set(evt.value()),
            }
            label {
                class: "form__label",
                r#for: "password",
                "Password: "
                span { class: "nowrap", "[4-20 chars incl. !@#$%]" }
            }
            input {
                class: incomplete("form__input", valid_pass),
                id: "password",
                name: "password",
                r#type: "password",
                autocomplete: "off",
                value: password(),
                oninput: move |evt: FormEvent| password.set(evt.value()),
            }
            RolePicker { selected: roles }
        }
    }
}

#[component]
pub fn EditUser(id: String) -> Element {
    let app = use_app();
    let _users = use_collection(TechNotes::users, SubscriptionOptions::default());

    match app.users().cache().select_by_id(&id) {
        Some(user) => rsx! { EditUserForm { key: "{id}", user } },
        None => rsx! { Loading {} },
    }
}

#[component]
fn EditUserForm(user: User) -> Element {
    let app = use_app();
    let nav = use_navigator();
    let mut username = use_signal({
        let initial = user.username.clone();
        move || initial
    });
    let mut password = use_signal(String::new);
    let roles = use_signal({
        let initial = user.roles.clone();
        move || initial
    });
    let mut active = use_signal(|| user.active);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let valid_name = valid_username(&username());
    // an empty password leaves it unchanged
    let valid_pass = password().is_empty() || valid_password(&password());
    let can_save = !roles.read().is_empty() && valid_name && valid_pass && !busy();
    let id = user.id.clone();

    let on_save = {
        let app = app.clone();
        let id = id.clone();
        move |_| {
            let app = app.clone();
            let new_password = password();
            let patch = UserUpdate {
                id: id.clone(),
                username: username(),
                roles: roles.read().iter().copied().collect(),
                active: active(),
                password: (!new_password.is_empty()).then_some(new_password),
            };
            async move {
                busy.set(true);
                let result = app.users().update(&patch).await;
                busy.set(false);
                match result {
                    Ok(_) => {
                        password.set(String::new());
                        nav.replace(Route::UsersList {});
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to update user");
                        error.set(Some(e.to_string()));
                    }
                }
            }
        }
    };

    let on_delete = move |_| {
        let app = app.clone();
        let id = id.clone();
        async move {
            busy.set(true);
            let result = app.users().delete(&id).await;
            busy.set(false);
            match result {
                Ok(_) => {
                    nav.replace(Route::UsersList {});
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to delete user");
                    error.set(Some(e.to_string()));
                }
            }
        }
    };

    rsx! {
        if let Some(message) = error() {
            ErrorMessage { message }
        }
        form {
            class: "form",
            onsubmit: move |evt: FormEvent| evt.prevent_default(),
            div {
                class: "form__title-row",
                h2 { "Edit User" }
                div {
                    class: "form__action-buttons",
                    button {
                        class: "icon-button",
                        title: "Save",
                        r#type: "button",
                        disabled: !can_save,
                        onclick: on_save,
                        Icon { icon: FaFloppyDisk, width: 28, height: 28 }
                    }
                    button {
                        class: "icon-button",
                        title: "Delete",
                        r#type: "button",
                        disabled: busy(),
                        onclick: on_delete,
                        Icon { icon: FaTrashCan, width: 28, height: 28 }
                    }
                }
            }
            label {
                class: "form__label",
                r#for: "username",
                "Username: "
                span { class: "nowrap", "[3-20 letters]" }
            }
            input {
                class: incomplete("form__input", valid_name),
                id: "username",
                name: "username",
                r#type: "text",
                autocomplete: "off",
                value: username(),
                oninput: move |evt: FormEvent| username.set(evt.value()),
            }
            label {
                class: "form__label",
                r#for: "password",
                "Password: "
                span { class: "nowrap", "[empty = no change]" }
                " "
                span { class: "nowrap", "[4-20 chars incl. !@#$%]" }
            }
            input {
                class: incomplete("form__input", valid_pass),
                id: "password",
                name: "password",
                r#type: "password",
                autocomplete: "off",
                value: password(),
                oninput: move |evt: FormEvent| password.set(evt.value()),
            }
            label {
                class: "form__label form__checkbox-container",
                r#for: "user-active",
                "ACTIVE:"
                input {
                    class: "form__checkbox",
                    id: "user-active",
                    name: "user-active",
                    r#type: "checkbox",
                    checked: active(),
                    onchange: move |_| active.toggle(),
                }
            }
            RolePicker { selected: roles }
        }
    }
}
