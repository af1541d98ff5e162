//! The identity provider seam.
//!
//! [`SignInFlow`](crate::flow::SignInFlow) only ever talks to an
//! [`IdentityProvider`]; [`FirebaseAuth`](super::FirebaseAuth) is the production
//! implementation and tests substitute scripted fakes.

use crate::error::AuthError;
use crate::models::{AuthenticatedUser, FederatedSignIn};

/// Async trait for an external authentication service.
pub trait IdentityProvider {
    /// Verify an email/password pair.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<AuthenticatedUser, AuthError>>;

    /// Run the provider-hosted interactive sign-in and wait for the user to
    /// complete or abandon it.
    fn sign_in_with_popup(
        &self,
    ) -> impl std::future::Future<Output = Result<FederatedSignIn, AuthError>>;
}
