//! # User-record lookup
//!
//! After a password sign-in the flow asks a [`UserDirectory`] for the user's
//! display name. [`FirestoreDirectory`] reads it from the `userName` field of the
//! `users/{uid}` document via the Firestore REST API, authenticated with the
//! freshly issued ID token.
//!
//! A missing document or a document without `userName` is `Ok(None)`, not an error.

use std::collections::HashMap;

use serde::Deserialize;

use crate::auth::{http_client, ProviderConfig};
use crate::error::AuthError;
use crate::models::AuthenticatedUser;

const USERS_COLLECTION: &str = "users";
const USER_NAME_FIELD: &str = "userName";

/// Async trait for resolving a display name by user id.
pub trait UserDirectory {
    fn get_user_name(
        &self,
        user: &AuthenticatedUser,
    ) -> impl std::future::Future<Output = Result<Option<String>, AuthError>>;
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldValue {
    string_value: Option<String>,
}

fn user_name_from_document(doc: Document) -> Option<String> {
    doc.fields
        .get(USER_NAME_FIELD)
        .and_then(|v| v.string_value.clone())
}

/// User records stored in Cloud Firestore.
pub struct FirestoreDirectory {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl FirestoreDirectory {
    pub fn new(config: ProviderConfig) -> Result<Self, AuthError> {
        Ok(Self {
            http: http_client(&config)?,
            config,
        })
    }
}

impl UserDirectory for FirestoreDirectory {
    async fn get_user_name(&self, user: &AuthenticatedUser) -> Result<Option<String>, AuthError> {
        let resp = self
            .http
            .get(self.config.document_url(USERS_COLLECTION, &user.uid))
            .bearer_auth(&user.id_token)
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(uid = %user.uid, "no user record");
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(AuthError::internal(format!(
                "user record lookup failed with status {}",
                resp.status()
            )));
        }

        let doc: Document = resp.json().await?;
        Ok(user_name_from_document(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_from_document() {
        let body = r#"{
            "name": "projects/passage-dev/databases/(default)/documents/users/U1",
            "fields": {
                "userName": {"stringValue": "Alice"},
                "email": {"stringValue": "a@b.com"}
            },
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }"#;
        let doc: Document = serde_json::from_str(body).unwrap();
        assert_eq!(user_name_from_document(doc).as_deref(), Some("Alice"));
    }

    #[test]
    fn test_document_without_user_name() {
        let body = r#"{"fields": {"email": {"stringValue": "a@b.com"}}}"#;
        let doc: Document = serde_json::from_str(body).unwrap();
        assert!(user_name_from_document(doc).is_none());
    }

    #[test]
    fn test_non_string_user_name() {
        let body = r#"{"fields": {"userName": {"nullValue": null}}}"#;
        let doc: Document = serde_json::from_str(body).unwrap();
        assert!(user_name_from_document(doc).is_none());
    }

    #[test]
    fn test_empty_document() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert!(user_name_from_document(doc).is_none());
    }
}
