//! Session data persisted after a successful sign-in.
//!
//! The record is split across two storage keys so that other parts of the
//! application can read the user id without decoding JSON:
//!
//! | Key | Value |
//! |-----|-------|
//! | [`UID_KEY`] (`"uid"`) | the provider's opaque user id, stored raw |
//! | [`USER_INFO_KEY`] (`"userInfo"`) | `{"email": "...", "userName": "..."}` as JSON |
//!
//! `userName` is omitted from the JSON when no display name is known.

use serde::{Deserialize, Serialize};

/// Storage key holding the raw user id.
pub const UID_KEY: &str = "uid";

/// Storage key holding the JSON-encoded [`UserInfo`].
pub const USER_INFO_KEY: &str = "userInfo";

/// Profile fields kept alongside the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub email: String,
    #[serde(rename = "userName", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl UserInfo {
    /// Get display name, falling back to email if no user name is known.
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.email)
    }
}

/// The minimal client-side proof that a user is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub uid: String,
    pub user_info: UserInfo,
}

impl SessionRecord {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, user_name: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            user_info: UserInfo {
                email: email.into(),
                user_name,
            },
        }
    }
}
