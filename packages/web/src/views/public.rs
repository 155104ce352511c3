use dioxus::prelude::*;

use crate::Route;

/// Landing page.
#[component]
pub fn Public() -> Element {
    rsx! {
        section {
            class: "public",
            header {
                h1 { "Welcome to " span { class: "nowrap", "Dan D. Repairs!" } }
            }
            main {
                class: "public__main",
                p {
                    "Located in Beautiful Downtown Foo City, Dan D. Repairs provides a trained staff ready to meet your tech repair needs."
                }
                address {
                    class: "public__addr",
                    "Dan D. Repairs"
                    br {}
                    "555 Foo Drive"
                    br {}
                    "Foo City, CA 12345"
                    br {}
                    a { href: "tel:+15555555555", "(555) 555-5555" }
                }
                br {}
                p { "Owner: Dan Davidson" }
            }
            footer {
                Link { to: Route::Login {}, "Employee Login" }
            }
        }
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    tracing::debug!(%path, "no route matched");
    rsx! {
        h1 { "There's nothing here: 404!" }
    }
}
