//! # Google OAuth 2.0 for federated sign-in
//!
//! Implements the Google Authorization Code flow with PKCE that backs
//! [`FirebaseAuth::sign_in_with_popup`](super::FirebaseAuth).
//!
//! ## Flow
//!
//! 1. **[`authorization_request`](GoogleOAuth::authorization_request)** builds an
//!    authorization URL requesting `openid`, `email` and `profile`, together with a
//!    random CSRF state and PKCE verifier. Nothing is persisted: the request lives in
//!    memory for as long as the popup is open.
//!
//! 2. **[`exchange_code`](GoogleOAuth::exchange_code)** checks the returned state
//!    against the request, then exchanges the code + PKCE verifier for a Google
//!    access token. The identity provider later trades that token for its own
//!    session via `accounts:signInWithIdp`.
//!
//! The client secret is optional; installed and browser clients run as public
//! PKCE clients.

use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge,
    PkceCodeVerifier, RequestTokenError, Scope, TokenResponse, TokenUrl,
};

use super::config::ProviderConfig;
use super::popup::CallbackParams;
use crate::error::{codes, AuthError};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// A pending authorization: the URL to show plus the secrets needed to finish it.
pub struct AuthorizationRequest {
    pub url: String,
    pub csrf_state: CsrfToken,
    pub pkce_verifier: PkceCodeVerifier,
}

/// Google OAuth handler.
pub struct GoogleOAuth {
    config: ProviderConfig,
    auth_url: AuthUrl,
    token_url: TokenUrl,
}

impl GoogleOAuth {
    pub fn new(config: ProviderConfig) -> Result<Self, AuthError> {
        Ok(Self {
            config,
            auth_url: AuthUrl::new(GOOGLE_AUTH_URL.to_string()).map_err(AuthError::internal)?,
            token_url: TokenUrl::new(GOOGLE_TOKEN_URL.to_string()).map_err(AuthError::internal)?,
        })
    }

    fn create_client(&self) -> ConfiguredClient {
        let client = BasicClient::new(self.config.google_client_id.clone())
            .set_auth_uri(self.auth_url.clone())
            .set_token_uri(self.token_url.clone())
            .set_redirect_uri(self.config.redirect_url.clone());
        match &self.config.google_client_secret {
            Some(secret) => client.set_client_secret(secret.clone()),
            None => client,
        }
    }

    /// Generate an authorization URL with PKCE.
    pub fn authorization_request(&self) -> AuthorizationRequest {
        let client = self.create_client();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        AuthorizationRequest {
            url: auth_url.to_string(),
            csrf_state,
            pkce_verifier,
        }
    }

    /// Exchange the authorization code for a Google access token.
    pub async fn exchange_code(
        &self,
        http_client: &reqwest::Client,
        params: CallbackParams,
        request: AuthorizationRequest,
    ) -> Result<String, AuthError> {
        if params.state != *request.csrf_state.secret() {
            tracing::warn!("OAuth state mismatch on redirect");
            return Err(AuthError::new(
                codes::INVALID_CREDENTIAL,
                "The sign-in response did not match the request.",
            ));
        }

        let client = self.create_client();
        let token_result = client
            .exchange_code(AuthorizationCode::new(params.code))
            .set_pkce_verifier(request.pkce_verifier)
            .request_async(http_client)
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(resp) => token_error(&resp),
                RequestTokenError::Request(e) => AuthError::network(e),
                RequestTokenError::Parse(e, _) => AuthError::internal(format!("Token exchange failed: {e}")),
                RequestTokenError::Other(e) => AuthError::internal(format!("Token exchange failed: {e}")),
            })?;

        Ok(token_result.access_token().secret().clone())
    }
}

fn token_error(resp: &BasicErrorResponse) -> AuthError {
    let detail = resp
        .error_description()
        .cloned()
        .unwrap_or_else(|| resp.error().to_string());
    tracing::warn!(error = %resp.error(), "Google token exchange rejected");
    AuthError::new(codes::INVALID_CREDENTIAL, detail)
}
