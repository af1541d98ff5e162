//! # Identities returned by the provider
//!
//! ## [`AuthenticatedUser`]
//!
//! The handle produced by a successful sign-in: the provider's opaque `uid`,
//! the account email, and the tokens needed to call other provider-backed
//! services on the user's behalf (the Firestore user-record lookup uses
//! `id_token`). Token fields are skipped by `Debug` so they never reach logs.
//!
//! ## [`FederatedSignIn`]
//!
//! A federated sign-in additionally returns the upstream provider's access token.
//! The identity object carries no `user_name`, so federated sessions are written
//! without a display name.

use serde::Deserialize;

/// An identity the provider has just authenticated.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    #[serde(rename = "localId")]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedUser {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            id_token: String::new(),
            refresh_token: String::new(),
        }
    }
}

/// Result of an interactive federated sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedSignIn {
    pub user: AuthenticatedUser,
    pub access_token: Option<String>,
}
