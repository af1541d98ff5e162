use thiserror::Error;

use crate::error::{codes, AuthError};
use store::StoreError;

/// Why a submission did not reach the authenticated view.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Another submission is still waiting on the provider.
    #[error("a sign-in attempt is already in flight")]
    InFlight,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("failed to persist session: {0}")]
    Storage(#[from] StoreError),
}

impl FlowError {
    /// The `(code, message)` pair shown to the user, if this error is shown at all.
    pub fn user_facing(&self) -> Option<(String, String)> {
        match self {
            FlowError::InFlight => None,
            FlowError::Auth(e) => Some((e.code.clone(), e.message.clone())),
            FlowError::Storage(_) => Some((
                codes::STORAGE_UNAVAILABLE.to_string(),
                "Unable to save your session on this device.".to_string(),
            )),
        }
    }
}

/// User-visible error state of the sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    pub is_error: bool,
    pub error_code: String,
    pub error_messages: Vec<String>,
}

impl ErrorState {
    /// Append a failure to this state.
    pub fn record(&self, code: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error_messages = self.error_messages.clone();
        error_messages.push(message.into());
        Self {
            is_error: true,
            error_code: code.into(),
            error_messages,
        }
    }

    /// Project a single provider failure onto a fresh state.
    pub fn project(err: &AuthError) -> Self {
        Self::default().record(err.code.clone(), err.message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_wrong_password() {
        let state = ErrorState::project(&AuthError::from_rest("INVALID_PASSWORD"));
        assert!(state.is_error);
        assert_eq!(state.error_code, "auth/wrong-password");
        assert_eq!(
            state.error_messages,
            vec!["The password is invalid or the user does not have a password.".to_string()]
        );
    }

    #[test]
    fn test_record_appends() {
        let state = ErrorState::default()
            .record("auth/user-not-found", "first")
            .record("auth/wrong-password", "second");
        assert_eq!(state.error_code, "auth/wrong-password");
        assert_eq!(state.error_messages, vec!["first", "second"]);
    }

    #[test]
    fn test_in_flight_is_not_user_facing() {
        assert!(FlowError::InFlight.user_facing().is_none());
    }

    #[test]
    fn test_storage_error_code() {
        let err = FlowError::Storage(StoreError::Unavailable("quota".to_string()));
        let (code, _) = err.user_facing().unwrap();
        assert_eq!(code, codes::STORAGE_UNAVAILABLE);
    }
}
