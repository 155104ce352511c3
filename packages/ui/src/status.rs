use dioxus::prelude::*;

/// Pulsing placeholder shown while a request is in flight.
#[component]
pub fn Loading() -> Element {
    rsx! {
        div {
            class: "loader",
            aria_label: "Loading",
            span { class: "loader__dot" }
            span { class: "loader__dot" }
            span { class: "loader__dot" }
        }
    }
}

#[component]
pub fn ErrorMessage(message: String) -> Element {
    rsx! {
        p { class: "errmsg", aria_live: "assertive", "{message}" }
    }
}
