//! Authentication against the external identity provider.

mod config;
mod firebase;
mod google;
mod popup;
mod provider;

pub use config::{ConfigError, ProviderConfig};
pub use firebase::{http_client, FirebaseAuth};
pub use google::{AuthorizationRequest, GoogleOAuth};
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use popup::BrowserPopup;
#[cfg(not(target_arch = "wasm32"))]
pub use popup::LoopbackPopup;
pub use popup::{CallbackParams, Popup};
pub use provider::IdentityProvider;
