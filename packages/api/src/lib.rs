//! # API crate: the sign-in flow for Passage
//!
//! Everything between the sign-in form and an authenticated session lives here,
//! free of any UI framework so it can be driven from the web and desktop
//! frontends and exercised directly in tests.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | `web` for the browser popup | Provider configuration, Firebase password and federated sign-in, Google OAuth with PKCE, popup windows |
//! | [`error`] | none | [`AuthError`] and the stable `auth/...` error codes |
//! | [`flow`] | none | [`SignInFlow`]: form state, submission, session materialization, error projection, navigation |
//! | [`models`] | none | Identities returned by the provider |
//! | [`users`] | none | Display-name lookup in the user-record collection |
//!
//! Session persistence is the `store` crate's job; [`SessionRecord`] and
//! [`UserInfo`] are re-exported for convenience.

pub mod auth;
pub mod error;
pub mod flow;
pub mod models;
pub mod users;

pub use auth::{FirebaseAuth, IdentityProvider, ProviderConfig};
pub use error::{codes, AuthError};
pub use flow::{
    DisplayName, ErrorState, Field, FlowError, FlowHooks, FlowState, FormInputs, SignInFlow,
    SignInMethod,
};
pub use models::{AuthenticatedUser, FederatedSignIn};
pub use users::{FirestoreDirectory, UserDirectory};

pub use store::{SessionRecord, UserInfo};
