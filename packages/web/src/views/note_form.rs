//! New-note and edit-note forms.

use std::sync::Arc;

use api::access::{can_delete_note, can_edit_note, NOT_AUTHORIZED_TO_EDIT};
use api::forms::valid_note;
use dioxus::prelude::*;
use store::{NewNote as NoteDraft, Note, NoteUpdate, SubscriptionOptions, User};
use ui::icons::{FaFloppyDisk, FaTrashCan};
use ui::{use_app, use_auth, use_collection, ErrorMessage, Icon, Loading, TechNotes};

use super::long_date;
use crate::Route;

fn use_all_users() -> Option<Arc<Vec<User>>> {
    let app = use_app();
    let users = use_collection(TechNotes::users, SubscriptionOptions::default());
    users.data.as_ref()?;
    let all = app.users().cache().select_all();
    (!all.is_empty()).then_some(all)
}

#[component]
pub fn NewNote() -> Element {
    match use_all_users() {
        Some(users) => rsx! { NewNoteForm { users } },
        None => rsx! { Loading {} },
    }
}

#[component]
fn OwnerSelect(users: Arc<Vec<User>>, mut selected: Signal<String>) -> Element {
    rsx! {
        label { class: "form__label form__checkbox-container", r#for: "note-username", "ASSIGNED TO:" }
        select {
            id: "note-username",
            name: "username",
            class: "form__select",
            value: selected(),
            onchange: move |evt| selected.set(evt.value()),
            for user in users.iter() {
                option { key: "{user.id}", value: "{user.id}", "{user.username}" }
            }
        }
    }
}

#[component]
fn NewNoteForm(users: Arc<Vec<User>>) -> Element {
    let app = use_app();
    let nav = use_navigator();
    let mut title = use_signal(String::new);
    let mut text = use_signal(String::new);
    let owner = use_signal({
        let first = users.first().map(|u| u.id.clone()).unwrap_or_default();
        move || first
    });
    let mut saving = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let can_save = valid_note(&owner(), &title(), &text()) && !saving();

    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        let app = app.clone();
        async move {
            if !valid_note(&owner(), &title(), &text()) {
                return;
            }
            saving.set(true);
            let draft = NoteDraft {
                user: owner(),
                title: title(),
                text: text(),
            };
            let result = app.notes().create(&draft).await;
            saving.set(false);
            match result {
                Ok(_) => {
                    nav.push(Route::NotesList {});
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to create note");
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
                h2 { "New Note" }
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
            label { class: "form__label", r#for: "title", "Title:" }
            input {
                class: if title().is_empty() { "form__input form__input--incomplete" } else { "form__input" },
                id: "title",
                name: "title",
                r#type: "text",
                autocomplete: "off",
                value: title(),
                oninput: move |evt: FormEvent| title.set(evt.value()),
            }
            label { class: "form__label", r#for: "text", "Text:" }
            textarea {
                class: if text().is_empty() { "form__input form__input--text form__input--incomplete" } else { "form__input form__input--text" },
                id: "text",
                name: "text",
                value: text(),
                oninput: move |evt: FormEvent| text.set(evt.value()),
            }
            OwnerSelect { users, selected: owner }
        }
    }
}

#[component]
pub fn EditNote(id: String) -> Element {
    let app = use_app();
    let auth = use_auth();
    let _notes = use_collection(TechNotes::notes, SubscriptionOptions::default());
    let users = use_all_users();

    let note = app.notes().cache().select_by_id(&id);
    let (Some(note), Some(users)) = (note, users) else {
        return rsx! { Loading {} };
    };

    let info = auth.read().clone();
    if !can_edit_note(&note, &info) {
        return rsx! { ErrorMessage { message: NOT_AUTHORIZED_TO_EDIT.to_string() } };
    }

    let note_id = note.id.clone();
    rsx! {
        EditNoteForm {
            key: "{note_id}",
            note,
            users,
            can_delete: can_delete_note(&info),
        }
    }
}

#[component]
fn EditNoteForm(note: Note, users: Arc<Vec<User>>, can_delete: bool) -> Element {
    let app = use_app();
    let nav = use_navigator();
    let mut title = use_signal({
        let initial = note.title.clone();
        move || initial
    });
    let mut text = use_signal({
        let initial = note.text.clone();
        move || initial
    });
    let mut completed = use_signal(|| note.completed);
    let owner = use_signal({
        let initial = note.user.clone();
        move || initial
    });
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let can_save = valid_note(&owner(), &title(), &text()) && !busy();
    let id = note.id.clone();

    let on_save = {
        let app = app.clone();
        let id = id.clone();
        move |_| {
            let app = app.clone();
            let patch = NoteUpdate {
                id: id.clone(),
                user: owner(),
                title: title(),
                text: text(),
                completed: completed(),
            };
            async move {
                busy.set(true);
                let result = app.notes().update(&patch).await;
                busy.set(false);
                match result {
                    Ok(_) => {
                        nav.push(Route::NotesList {});
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to update note");
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
            let result = app.notes().delete(&id).await;
            busy.set(false);
            match result {
                Ok(_) => {
                    nav.push(Route::NotesList {});
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to delete note");
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
                h2 {
                    "Edit Note"
                    if let Some(ticket) = note.ticket {
                        " #{ticket}"
                    }
                }
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
                    if can_delete {
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
            }
            label { class: "form__label", r#for: "note-title", "Title:" }
            input {
                class: if title().is_empty() { "form__input form__input--incomplete" } else { "form__input" },
                id: "note-title",
                name: "title",
                r#type: "text",
                autocomplete: "off",
                value: title(),
                oninput: move |evt: FormEvent| title.set(evt.value()),
            }
            label { class: "form__label", r#for: "note-text", "Text:" }
            textarea {
                class: if text().is_empty() { "form__input form__input--text form__input--incomplete" } else { "form__input form__input--text" },
                id: "note-text",
                name: "text",
                value: text(),
                oninput: move |evt: FormEvent| text.set(evt.value()),
            }
            div {
                class: "form__row",
                div {
                    class: "form__divider",
                    label {
                        class: "form__label form__checkbox-container",
                        r#for: "note-completed",
                        "WORK COMPLETE:"
                        input {
                            class: "form__checkbox",
                            id: "note-completed",
                            name: "completed",
                            r#type: "checkbox",
                            checked: completed(),
                            onchange: move |_| completed.toggle(),
                        }
                    }
                    OwnerSelect { users, selected: owner }
                }
                div {
                    class: "form__divider",
                    p { class: "form__created", "Created:" br {} {long_date(note.created_at)} }
                    p { class: "form__updated", "Updated:" br {} {long_date(note.updated_at)} }
                }
            }
        }
    }
}
