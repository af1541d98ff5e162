//! Shared session and flow constructors for all platforms.
//!
//! | Platform | Session store | Popup |
//! |----------|---------------|-------|
//! | **Web** (WASM + `web` feature) | `localStorage` via [`store::LocalStorageStore`] | browser window via [`api::auth::BrowserPopup`] |
//! | **Desktop** (native) | `<data_dir>/passage/storage.json` via [`store::FileStore`] | system browser + loopback callback via [`api::auth::LoopbackPopup`] |

use api::auth::{FirebaseAuth, ProviderConfig};
use api::{AuthError, FirestoreDirectory, FlowHooks, SignInFlow};
use store::{SessionRecord, SessionRepository};

#[cfg(target_arch = "wasm32")]
pub type PlatformStore = store::LocalStorageStore;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = store::FileStore;

#[cfg(target_arch = "wasm32")]
type PlatformPopup = api::auth::BrowserPopup;
#[cfg(not(target_arch = "wasm32"))]
type PlatformPopup = api::auth::LoopbackPopup;

/// The sign-in flow wired to this platform's provider, directory and store.
pub type PlatformFlow = SignInFlow<FirebaseAuth<PlatformPopup>, FirestoreDirectory, PlatformStore>;

/// Create the platform-appropriate session store.
pub fn make_session_store() -> PlatformStore {
    #[cfg(target_arch = "wasm32")]
    {
        store::LocalStorageStore::new()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("passage");
        store::FileStore::new(base)
    }
}

fn load_config() -> Result<ProviderConfig, AuthError> {
    #[cfg(target_arch = "wasm32")]
    let config = ProviderConfig::from_build_env();
    #[cfg(not(target_arch = "wasm32"))]
    let config = ProviderConfig::from_env();
    config.map_err(|e| {
        tracing::error!(error = %e, "identity provider is not configured");
        AuthError::internal(e)
    })
}

/// Build the sign-in flow for this platform.
pub fn make_sign_in_flow(hooks: FlowHooks) -> Result<PlatformFlow, AuthError> {
    let config = load_config()?;
    let provider = FirebaseAuth::new(config.clone(), PlatformPopup::default())?;
    let directory = FirestoreDirectory::new(config)?;
    Ok(SignInFlow::new(provider, directory, make_session_store(), hooks))
}

/// Read the persisted session record, treating an unreadable store as signed out.
pub async fn load_session() -> Option<SessionRecord> {
    match SessionRepository::new(make_session_store()).load().await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted session");
            None
        }
    }
}
