//! # Firebase Authentication over REST
//!
//! [`FirebaseAuth`] implements [`IdentityProvider`] against the Identity Toolkit
//! REST API (or the local auth emulator when `FIREBASE_AUTH_EMULATOR_HOST` is set).
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | password sign-in | `accounts:signInWithPassword` |
//! | federated sign-in | [`Popup`] + [`GoogleOAuth`], then `accounts:signInWithIdp` |
//!
//! Failed calls answer with `{"error": {"code": 400, "message": "INVALID_PASSWORD"}}`;
//! the message is mapped through [`AuthError::from_rest`]. `signInWithIdp` can also
//! answer `200` with an `errorMessage` field, which is treated the same way.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::config::ProviderConfig;
use super::google::GoogleOAuth;
use super::popup::Popup;
use super::provider::IdentityProvider;
use crate::error::AuthError;
use crate::models::{AuthenticatedUser, FederatedSignIn};

const GOOGLE_PROVIDER_ID: &str = "google.com";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdpResponse {
    #[serde(flatten)]
    user: AuthenticatedUser,
    #[serde(default)]
    oauth_access_token: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct RestErrorBody {
    error: RestError,
}

#[derive(Deserialize)]
struct RestError {
    message: String,
}

/// Build the shared HTTP client, with a request timeout where the platform supports one.
pub fn http_client(config: &ProviderConfig) -> Result<reqwest::Client, AuthError> {
    let builder = reqwest::ClientBuilder::new();
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder
        .timeout(config.request_timeout)
        .redirect(reqwest::redirect::Policy::none());
    #[cfg(target_arch = "wasm32")]
    let _ = config;
    builder.build().map_err(AuthError::internal)
}

/// Identity provider backed by Firebase Authentication.
pub struct FirebaseAuth<P: Popup> {
    config: ProviderConfig,
    http: reqwest::Client,
    google: GoogleOAuth,
    popup: P,
}

impl<P: Popup> FirebaseAuth<P> {
    pub fn new(config: ProviderConfig, popup: P) -> Result<Self, AuthError> {
        Ok(Self {
            http: http_client(&config)?,
            google: GoogleOAuth::new(config.clone())?,
            config,
            popup,
        })
    }

    async fn post<T: DeserializeOwned>(&self, method: &str, body: &impl Serialize) -> Result<T, AuthError> {
        let resp = self
            .http
            .post(self.config.accounts_url(method))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let text = resp.text().await?;
        Err(rest_error(status.as_u16(), &text))
    }
}

fn rest_error(status: u16, body: &str) -> AuthError {
    match serde_json::from_str::<RestErrorBody>(body) {
        Ok(parsed) => AuthError::from_rest(&parsed.error.message),
        Err(_) => AuthError::internal(format!("unexpected response status {status}")),
    }
}

fn federated_result(resp: IdpResponse) -> Result<FederatedSignIn, AuthError> {
    if let Some(message) = resp.error_message {
        return Err(AuthError::from_rest(&message));
    }
    Ok(FederatedSignIn {
        user: resp.user,
        access_token: resp.oauth_access_token,
    })
}

fn idp_post_body(access_token: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("access_token", access_token)
        .append_pair("providerId", GOOGLE_PROVIDER_ID)
        .finish()
}

impl<P: Popup> IdentityProvider for FirebaseAuth<P> {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.post("signInWithPassword", &request).await
    }

    async fn sign_in_with_popup(&self) -> Result<FederatedSignIn, AuthError> {
        let redirect_uri = self.config.redirect_url.as_str();
        let request = self.google.authorization_request();
        let params = self.popup.authorize(&request.url, redirect_uri).await?;
        let access_token = self.google.exchange_code(&self.http, params, request).await?;

        let body = IdpRequest {
            post_body: idp_post_body(&access_token),
            request_uri: redirect_uri,
            return_secure_token: true,
            return_idp_credential: true,
        };
        let resp: IdpResponse = self.post("signInWithIdp", &body).await?;
        federated_result(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;

    #[test]
    fn test_rest_error_maps_message() {
        let body = r#"{"error":{"code":400,"message":"INVALID_PASSWORD","errors":[{"message":"INVALID_PASSWORD","domain":"global","reason":"invalid"}]}}"#;
        let err = rest_error(400, body);
        assert_eq!(err.code, codes::WRONG_PASSWORD);
    }

    #[test]
    fn test_rest_error_without_json_body() {
        let err = rest_error(502, "<html>Bad Gateway</html>");
        assert_eq!(err.code, codes::INTERNAL_ERROR);
        assert!(err.message.contains("502"));
    }

    #[test]
    fn test_federated_result_keeps_access_token() {
        let body = r#"{
            "federatedId": "https://accounts.google.com/1234",
            "providerId": "google.com",
            "localId": "U2",
            "email": "c@d.com",
            "displayName": "Carol",
            "idToken": "id-token",
            "refreshToken": "refresh-token",
            "oauthAccessToken": "google-access-token"
        }"#;
        let resp: IdpResponse = serde_json::from_str(body).unwrap();
        let signed_in = federated_result(resp).unwrap();
        assert_eq!(signed_in.user.uid, "U2");
        assert_eq!(signed_in.user.email, "c@d.com");
        assert_eq!(signed_in.access_token.as_deref(), Some("google-access-token"));
    }

    #[test]
    fn test_federated_result_error_message() {
        let body = r#"{"localId": "", "errorMessage": "OPERATION_NOT_ALLOWED"}"#;
        let resp: IdpResponse = serde_json::from_str(body).unwrap();
        let err = federated_result(resp).unwrap_err();
        assert_eq!(err.code, codes::OPERATION_NOT_ALLOWED);
    }

    #[test]
    fn test_idp_post_body_is_form_encoded() {
        assert_eq!(
            idp_post_body("ya29.a&b"),
            "access_token=ya29.a%26b&providerId=google.com"
        );
    }

    #[test]
    fn test_password_request_shape() {
        let request = PasswordRequest {
            email: "a@b.com",
            password: "secret123",
            return_secure_token: true,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"email": "a@b.com", "password": "secret123", "returnSecureToken": true})
        );
    }
}
