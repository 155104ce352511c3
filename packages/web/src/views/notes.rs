use api::access::visible_note_ids;
use dioxus::prelude::*;
use store::Note;
use ui::icons::FaPenToSquare;
use ui::{use_auth, use_notes, ErrorMessage, Icon, Loading};

use super::short_date;
use crate::Route;

/// Notes table. Managers and admins see every note, employees their own.
#[component]
pub fn NotesList() -> Element {
    let notes = use_notes();
    let auth = use_auth();

    let content = if notes.is_loading() {
        rsx! { Loading {} }
    } else if let (true, Some(error)) = (notes.is_error(), &notes.error) {
        rsx! { ErrorMessage { message: error.to_string() } }
    } else if let Some(data) = &notes.data {
        let ids = visible_note_ids(data, &auth.read());
        rsx! {
            table {
                class: "table table--notes",
                thead {
                    class: "table__thead",
                    tr {
                        th { scope: "col", class: "table__th note__status", "Status" }
                        th { scope: "col", class: "table__th note__created", "Created" }
                        th { scope: "col", class: "table__th note__updated", "Updated" }
                        th { scope: "col", class: "table__th note__title", "Title" }
                        th { scope: "col", class: "table__th note__username", "Owner" }
                        th { scope: "col", class: "table__th note__edit", "Edit" }
                    }
                }
                tbody {
                    for id in ids {
                        if let Some(note) = data.get(&id) {
                            NoteRow { key: "{id}", note: note.clone() }
                        }
                    }
                }
            }
        }
    } else {
        rsx! {}
    };

    rsx! {
        section {
            h1 { "Notes" }
            {content}
        }
    }
}

#[component]
fn NoteRow(note: Note) -> Element {
    let nav = use_navigator();
    let id = note.id.clone();
    let (status_class, status) = if note.completed {
        ("note__status--completed", "Completed")
    } else {
        ("note__status--open", "Open")
    };

    rsx! {
        tr {
            class: "table__row",
            td { class: "table__cell note__status",
                span { class: "{status_class}", "{status}" }
            }
            td { class: "table__cell note__created", {short_date(note.created_at)} }
            td { class: "table__cell note__updated", {short_date(note.updated_at)} }
            td { class: "table__cell note__title", "{note.title}" }
            td { class: "table__cell note__username", "{note.username}" }
            td { class: "table__cell",
                button {
                    class: "icon-button table__button",
                    title: "Edit",
                    onclick: move |_| {
                        nav.push(Route::EditNote { id: id.clone() });
                    },
                    Icon { icon: FaPenToSquare, width: 20, height: 20 }
                }
            }
        }
    }
}
