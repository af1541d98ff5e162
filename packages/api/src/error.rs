//! Provider failures as `(code, message)` pairs.
//!
//! Codes use the identity provider's client vocabulary (`auth/wrong-password`,
//! `auth/popup-closed-by-user`, ...) so they can be shown to users and matched
//! in tests. [`AuthError::from_rest`] maps the REST identifiers returned by
//! `identitytoolkit.googleapis.com` onto that vocabulary.

use thiserror::Error;

/// Well-known error codes.
pub mod codes {
    pub const USER_NOT_FOUND: &str = "auth/user-not-found";
    pub const WRONG_PASSWORD: &str = "auth/wrong-password";
    pub const USER_DISABLED: &str = "auth/user-disabled";
    pub const INVALID_EMAIL: &str = "auth/invalid-email";
    pub const INVALID_CREDENTIAL: &str = "auth/invalid-credential";
    pub const MISSING_PASSWORD: &str = "auth/missing-password";
    pub const TOO_MANY_REQUESTS: &str = "auth/too-many-requests";
    pub const OPERATION_NOT_ALLOWED: &str = "auth/operation-not-allowed";
    pub const NETWORK_REQUEST_FAILED: &str = "auth/network-request-failed";
    pub const POPUP_CLOSED_BY_USER: &str = "auth/popup-closed-by-user";
    pub const POPUP_BLOCKED: &str = "auth/popup-blocked";
    pub const INTERNAL_ERROR: &str = "auth/internal-error";
    pub const STORAGE_UNAVAILABLE: &str = "session/storage-unavailable";
}

/// A failure reported by the identity provider or one of its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct AuthError {
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Map a REST error identifier such as `INVALID_PASSWORD` or
    /// `TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account...`.
    pub fn from_rest(raw: &str) -> Self {
        let ident = raw.split(" : ").next().unwrap_or(raw).trim();
        let (code, message) = match ident {
            "EMAIL_NOT_FOUND" => (
                codes::USER_NOT_FOUND,
                "There is no user record corresponding to this identifier. The user may have been deleted.",
            ),
            "INVALID_PASSWORD" => (
                codes::WRONG_PASSWORD,
                "The password is invalid or the user does not have a password.",
            ),
            "USER_DISABLED" => (
                codes::USER_DISABLED,
                "The user account has been disabled by an administrator.",
            ),
            "INVALID_EMAIL" => (codes::INVALID_EMAIL, "The email address is badly formatted."),
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => (
                codes::INVALID_CREDENTIAL,
                "The supplied auth credential is incorrect, malformed or has expired.",
            ),
            "MISSING_PASSWORD" => (codes::MISSING_PASSWORD, "A non-empty password must be provided."),
            "TOO_MANY_ATTEMPTS_TRY_LATER" => (
                codes::TOO_MANY_REQUESTS,
                "Access to this account has been temporarily disabled due to many failed login attempts.",
            ),
            "OPERATION_NOT_ALLOWED" => (
                codes::OPERATION_NOT_ALLOWED,
                "The given sign-in provider is disabled for this project.",
            ),
            _ => return Self::new(codes::INTERNAL_ERROR, raw),
        };
        Self::new(code, message)
    }

    pub fn network(detail: impl std::fmt::Display) -> Self {
        tracing::debug!(%detail, "provider request failed");
        Self::new(codes::NETWORK_REQUEST_FAILED, "A network error has occurred.")
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::new(codes::INTERNAL_ERROR, detail.to_string())
    }

    pub fn popup_closed() -> Self {
        Self::new(
            codes::POPUP_CLOSED_BY_USER,
            "The popup has been closed by the user before finalizing the operation.",
        )
    }

    pub fn popup_blocked() -> Self {
        Self::new(
            codes::POPUP_BLOCKED,
            "Unable to establish a connection with the popup. It may have been blocked by the browser.",
        )
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::internal(e)
        } else {
            Self::network(e)
        }
    }
}
