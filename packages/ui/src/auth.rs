//! Authentication context and hooks for the UI.

use dioxus::prelude::*;
use store::SessionRecord;

use crate::session::load_session;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<SessionRecord>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user signs in.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Publish a freshly written session to the auth context.
/// Must run before navigation drops the sign-in form's scope.
pub fn set_signed_in(mut auth_state: Signal<AuthState>, session: SessionRecord) {
    tracing::debug!(uid = %session.uid, "session published to auth context");
    auth_state.set(AuthState {
        session: Some(session),
        loading: false,
    });
}

/// Provider component that restores any persisted session on mount.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);

    let _ = use_resource(move || async move {
        let session = load_session().await;
        // A sign-in that finished first wins over the restored record.
        if !auth_state.peek().loading {
            return;
        }
        if let Some(session) = &session {
            tracing::debug!(uid = %session.uid, "restored persisted session");
        }
        auth_state.set(AuthState {
            session,
            loading: false,
        });
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}
