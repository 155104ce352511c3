use dioxus::prelude::*;

use ui::TechNotesProvider;
use views::{
    DashLayout, EditNote, EditUser, Login, NewNote, NewUser, NotFound, NotesList, PersistLogin,
    Prefetch, Public, RequireAuth, RequireManager, UsersList, Welcome,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Public {},
    #[route("/login")]
    Login {},
    #[layout(PersistLogin)]
        #[layout(RequireAuth)]
            #[layout(Prefetch)]
                #[nest("/dash")]
                    #[layout(DashLayout)]
                        #[route("/")]
                        Welcome {},
                        #[route("/notes")]
                        NotesList {},
                        #[route("/notes/new")]
                        NewNote {},
                        #[route("/notes/:id")]
                        EditNote { id: String },
                        #[layout(RequireManager)]
                            #[route("/users")]
                            UsersList {},
                            #[route("/users/new")]
                            NewUser {},
                            #[route("/users/:id")]
                            EditUser { id: String },
                        #[end_layout]
                    #[end_layout]
                #[end_nest]
            #[end_layout]
        #[end_layout]
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Dan D. Repairs!" }
        style { {ui::STYLES} }

        TechNotesProvider {
            Router::<Route> {}
        }
    }
}
