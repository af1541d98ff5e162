//! This crate contains all shared UI for the workspace.

#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
compile_error!("the `web` feature is required when building for wasm32");

mod session;
pub use session::{load_session, make_session_store, make_sign_in_flow, PlatformFlow, PlatformStore};

mod auth;
pub use auth::{set_signed_in, use_auth, AuthProvider, AuthState};

mod alert;
pub use alert::ErrorAlert;

mod sign_in_form;
pub use sign_in_form::{flow_hooks, SignInForm};
