mod public;
pub use public::{NotFound, Public};

mod login;
pub use login::Login;

mod layouts;
pub use layouts::{DashLayout, PersistLogin, Prefetch, RequireAuth, RequireManager};

mod dash_header;
pub use dash_header::{DashFooter, DashHeader};

mod welcome;
pub use welcome::Welcome;

mod notes;
pub use notes::NotesList;

mod note_form;
pub use note_form::{EditNote, NewNote};

mod users;
pub use users::UsersList;

mod user_form;
pub use user_form::{EditUser, NewUser};

/// `"2 March"` style date for tables and forms.
pub(crate) fn short_date(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map(|d| d.format("%-d %B").to_string()).unwrap_or_default()
}

/// Full timestamp for the note form footer.
pub(crate) fn long_date(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map(|d| d.format("%-d %B %Y, %H:%M:%S").to_string())
        .unwrap_or_default()
}
