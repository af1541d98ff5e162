use api::ErrorState;
use dioxus::prelude::*;

/// Error banner for the sign-in form. Renders nothing when there is no error.
#[component]
pub fn ErrorAlert(state: ErrorState) -> Element {
    if !state.is_error {
        return rsx! {};
    }

    rsx! {
        div {
            role: "alert",
            style: "width: 100%; max-width: 320px; padding: 0.625rem; margin-bottom: 0.75rem; background: #fef2f2; border: 1px solid #fecaca; border-radius: 4px; color: #dc2626; font-size: 0.8125rem;",
            strong { "{state.error_code}" }
            for message in state.error_messages.iter() {
                p { style: "margin: 0.25rem 0 0 0;", "{message}" }
            }
        }
    }
}
