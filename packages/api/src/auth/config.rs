//! Provider configuration from environment variables.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `FIREBASE_API_KEY` | yes | |
//! | `FIREBASE_PROJECT_ID` | yes | |
//! | `GOOGLE_CLIENT_ID` | yes | |
//! | `GOOGLE_CLIENT_SECRET` | no | none (public PKCE client) |
//! | `AUTH_REDIRECT_URI` | no | platform specific, see [`ProviderConfig::from_env`] |
//! | `FIREBASE_AUTH_EMULATOR_HOST` | no | none (production endpoints) |
//! | `PASSAGE_REQUEST_TIMEOUT_SECS` | no | `30` |
//!
//! Native builds read the process environment (and a `.env` file via `dotenvy`).
//! Web builds have no process environment, so [`ProviderConfig::from_build_env`]
//! captures the same variables at compile time.

use std::time::Duration;

use oauth2::{ClientId, ClientSecret, RedirectUrl};
use thiserror::Error;

pub const API_KEY_VAR: &str = "FIREBASE_API_KEY";
pub const PROJECT_ID_VAR: &str = "FIREBASE_PROJECT_ID";
pub const GOOGLE_CLIENT_ID_VAR: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET_VAR: &str = "GOOGLE_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "AUTH_REDIRECT_URI";
pub const EMULATOR_HOST_VAR: &str = "FIREBASE_AUTH_EMULATOR_HOST";
pub const TIMEOUT_VAR: &str = "PASSAGE_REQUEST_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Identity provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub project_id: String,
    pub google_client_id: ClientId,
    pub google_client_secret: Option<ClientSecret>,
    pub redirect_url: RedirectUrl,
    pub emulator_host: Option<String>,
    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Load from the process environment. The redirect defaults to a loopback
    /// address served by [`LoopbackPopup`](crate::auth::LoopbackPopup).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(
            |name| std::env::var(name).ok(),
            "http://127.0.0.1:8765/auth/callback",
        )
    }

    /// Load from variables captured when the crate was compiled.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(
            |name| {
                match name {
                    API_KEY_VAR => option_env!("FIREBASE_API_KEY"),
                    PROJECT_ID_VAR => option_env!("FIREBASE_PROJECT_ID"),
                    GOOGLE_CLIENT_ID_VAR => option_env!("GOOGLE_CLIENT_ID"),
                    GOOGLE_CLIENT_SECRET_VAR => option_env!("GOOGLE_CLIENT_SECRET"),
                    REDIRECT_URI_VAR => option_env!("AUTH_REDIRECT_URI"),
                    EMULATOR_HOST_VAR => option_env!("FIREBASE_AUTH_EMULATOR_HOST"),
                    TIMEOUT_VAR => option_env!("PASSAGE_REQUEST_TIMEOUT_SECS"),
                    _ => None,
                }
                .map(str::to_string)
            },
            "http://localhost:8080/auth/callback",
        )
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        default_redirect: &str,
    ) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = required(API_KEY_VAR)?;
        let project_id = required(PROJECT_ID_VAR)?;
        let google_client_id = ClientId::new(required(GOOGLE_CLIENT_ID_VAR)?);
        let google_client_secret = optional(GOOGLE_CLIENT_SECRET_VAR).map(ClientSecret::new);

        let redirect = optional(REDIRECT_URI_VAR).unwrap_or_else(|| default_redirect.to_string());
        let redirect_url = RedirectUrl::new(redirect).map_err(|e| ConfigError::Invalid {
            name: REDIRECT_URI_VAR,
            reason: e.to_string(),
        })?;

        let request_timeout = match optional(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: TIMEOUT_VAR,
                    reason: format!("expected seconds, got {raw:?}"),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key,
            project_id,
            google_client_id,
            google_client_secret,
            redirect_url,
            emulator_host: optional(EMULATOR_HOST_VAR),
            request_timeout,
        })
    }

    /// Endpoint for an `accounts:<method>` call, honouring the auth emulator.
    pub fn accounts_url(&self, method: &str) -> String {
        match &self.emulator_host {
            Some(host) => format!(
                "http://{host}/identitytoolkit.googleapis.com/v1/accounts:{method}?key={}",
                self.api_key
            ),
            None => format!(
                "https://identitytoolkit.googleapis.com/v1/accounts:{method}?key={}",
                self.api_key
            ),
        }
    }

    /// Firestore REST URL of a single document.
    pub fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents/{collection}/{id}",
            self.project_id
        )
    }
}
