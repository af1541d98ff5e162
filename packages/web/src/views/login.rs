//! Login page view with email/password and Google sign-in.

use dioxus::prelude::*;
use ui::{use_auth, SignInForm};

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    // If already signed in, go straight to the home view
    if !auth().loading && auth().session.is_some() {
        nav.replace(Route::Home {});
    }

    rsx! {
        div {
            class: "login-container",
            style: "display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; padding: 2rem; background: #ffffff;",

            h1 {
                style: "margin-bottom: 0.5rem; color: #37352f; font-weight: 700; font-size: 1.75rem;",
                "Passage"
            }

            p {
                style: "margin-bottom: 2rem; color: #787774; font-size: 0.9375rem;",
                "Sign in to your account"
            }

            SignInForm {
                on_navigate_home: move |_| {
                    nav.replace(Route::Home {});
                },
            }
        }
    }
}
