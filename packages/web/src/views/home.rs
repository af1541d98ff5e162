use dioxus::prelude::*;
use ui::use_auth;

use crate::Route;

/// Authenticated landing view. Sends signed-out visitors to `/login`.
#[component]
pub fn Home() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    let state = auth();
    if state.loading {
        return rsx! {};
    }
    let Some(session) = state.session else {
        nav.replace(Route::Login {});
        return rsx! {};
    };
    let name = session.user_info.display_name().to_string();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; padding: 2rem;",
            h1 {
                style: "color: #37352f; font-weight: 700; font-size: 1.5rem;",
                "Welcome, {name}"
            }
            p {
                style: "color: #787774; font-size: 0.875rem;",
                "Signed in as {session.user_info.email}"
            }
        }
    }
}
