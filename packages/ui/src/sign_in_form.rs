//! Email/password and Google sign-in form.
//!
//! The form owns a [`PlatformFlow`] for its lifetime. Field edits and submissions
//! go to the flow; after every await the flow's form, error and state are copied
//! back into signals so the view re-renders. Buttons stay disabled while a
//! submission is in flight.

use std::rc::Rc;

use api::{ErrorState, FlowHooks, FlowState, FormInputs, SignInMethod};
use store::SessionRecord;
use dioxus::prelude::*;

use crate::alert::ErrorAlert;
use crate::auth::{set_signed_in, use_auth, AuthState};
use crate::session::{make_sign_in_flow, PlatformFlow};

const BUTTON_STYLE: &str = "display: flex; align-items: center; justify-content: center; width: 100%; padding: 0.625rem 1.25rem; border: none; border-radius: 4px; font-size: 0.9375rem; font-weight: 500; cursor: pointer;";
const INPUT_STYLE: &str = "width: 100%; padding: 0.5rem 0.75rem; border: 1px solid #d4d4d4; border-radius: 4px; font-size: 0.9375rem; box-sizing: border-box;";

/// Copy the flow's observable state into the view's signals.
fn mirror(
    flow: &PlatformFlow,
    mut form: Signal<FormInputs>,
    mut error: Signal<ErrorState>,
    mut state: Signal<FlowState>,
) {
    form.set(flow.form());
    error.set(flow.error_state());
    state.set(flow.state());
}

/// Hooks that publish the new session to `auth` and then hand off navigation.
pub fn flow_hooks(auth: Signal<AuthState>, on_navigate_home: EventHandler<()>) -> FlowHooks {
    FlowHooks::new(
        move |session: &SessionRecord| set_signed_in(auth, session.clone()),
        move || on_navigate_home.call(()),
    )
}

#[component]
pub fn SignInForm(on_navigate_home: EventHandler<()>) -> Element {
    let auth = use_auth();
    let flow = use_hook(move || make_sign_in_flow(flow_hooks(auth, on_navigate_home)).map(Rc::new));

    let mut form = use_signal(FormInputs::default);
    let mut error = use_signal(ErrorState::default);
    let mut state = use_signal(FlowState::default);

    let flow = match flow {
        Ok(flow) => flow,
        Err(e) => {
            return rsx! {
                ErrorAlert { state: ErrorState::project(&e) }
            };
        }
    };

    let field_change = {
        let flow = flow.clone();
        move |name: &'static str| {
            let flow = flow.clone();
            move |evt: FormEvent| {
                flow.on_field_change(name, evt.value());
                form.set(flow.form());
            }
        }
    };

    let submit = {
        let flow = flow.clone();
        move |method: SignInMethod| {
            let flow = flow.clone();
            spawn(async move {
                error.set(ErrorState::default());
                state.set(FlowState::Submitting(method));
                let result = match method {
                    SignInMethod::Password => flow.submit().await,
                    SignInMethod::Federated => flow.submit_federated().await,
                };
                if let Err(e) = &result {
                    tracing::debug!(?method, error = %e, "sign-in did not complete");
                }
                mirror(&flow, form, error, state);
            });
        }
    };

    let submit_password = {
        let submit = submit.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            submit(SignInMethod::Password);
        }
    };
    let submit_federated = move |_| submit(SignInMethod::Federated);

    let busy = state().is_in_flight();
    let inputs = form();

    rsx! {
        ErrorAlert { state: error() }

        form {
            onsubmit: submit_password,
            style: "display: flex; flex-direction: column; gap: 0.75rem; width: 100%; max-width: 320px;",

            input {
                style: INPUT_STYLE,
                r#type: "email",
                name: "email",
                placeholder: "Email",
                autocomplete: "email",
                required: true,
                value: "{inputs.email}",
                oninput: field_change("email"),
            }

            input {
                style: INPUT_STYLE,
                r#type: "password",
                name: "password",
                placeholder: "Password",
                autocomplete: "current-password",
                required: true,
                value: "{inputs.password}",
                oninput: field_change("password"),
            }

            button {
                style: "{BUTTON_STYLE} background-color: #37352f; color: white;",
                r#type: "submit",
                disabled: busy,
                if state() == FlowState::Submitting(SignInMethod::Password) { "Signing in..." } else { "Sign in" }
            }
        }

        div {
            style: "display: flex; align-items: center; gap: 1rem; width: 100%; max-width: 320px; margin: 1.5rem 0;",
            div { style: "flex: 1; height: 1px; background: #d4d4d4;" }
            span { style: "color: #787774; font-size: 0.8125rem;", "or" }
            div { style: "flex: 1; height: 1px; background: #d4d4d4;" }
        }

        div {
            style: "width: 100%; max-width: 320px;",
            button {
                style: "{BUTTON_STYLE} background-color: #4285f4; color: white;",
                r#type: "button",
                disabled: busy,
                onclick: submit_federated,
                if state() == FlowState::Submitting(SignInMethod::Federated) { "Waiting for Google..." } else { "Continue with Google" }
            }
        }
    }
}
