//! # Interactive sign-in windows
//!
//! A [`Popup`] shows the provider's consent page and waits for it to redirect
//! back to `redirect_uri` with an authorization code.
//!
//! | Implementation | Platform | Mechanism |
//! |----------------|----------|-----------|
//! | [`BrowserPopup`] | web | `window.open`, then polls the popup until its location is back on our origin |
//! | [`LoopbackPopup`] | native | opens the system browser and accepts one request on the redirect's loopback address |
//!
//! Closing the window or declining consent yields `auth/popup-closed-by-user`,
//! as does a loopback wait that times out. A window that cannot be opened
//! yields `auth/popup-blocked`.

use url::Url;

use crate::error::AuthError;

/// Query parameters delivered to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

impl CallbackParams {
    /// Parse the full redirect URL the provider sent the user back to.
    pub fn from_redirect(redirect: &str) -> Result<Self, AuthError> {
        let url = Url::parse(redirect).map_err(AuthError::internal)?;
        Self::from_url(&url)
    }

    pub fn from_url(url: &Url) -> Result<Self, AuthError> {
        let mut code = None;
        let mut state = None;
        let mut error = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Err(match error.as_str() {
                // Declining consent abandons the window like closing it does.
                "access_denied" => AuthError::popup_closed(),
                other => AuthError::internal(format!("authorization failed: {other}")),
            });
        }

        match (code, state) {
            (Some(code), Some(state)) => Ok(Self { code, state }),
            _ => Err(AuthError::internal("redirect is missing code or state")),
        }
    }
}

/// Async trait for showing the provider's consent page.
pub trait Popup {
    fn authorize(
        &self,
        url: &str,
        redirect_uri: &str,
    ) -> impl std::future::Future<Output = Result<CallbackParams, AuthError>>;
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use browser::BrowserPopup;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod browser {
    use std::time::Duration;

    use super::{CallbackParams, Popup};
    use crate::error::AuthError;

    const POPUP_NAME: &str = "passage-signin";
    const POPUP_FEATURES: &str = "popup,width=500,height=600";

    /// Popup window driven from the page that opened it.
    #[derive(Clone, Debug)]
    pub struct BrowserPopup {
        poll_interval: Duration,
    }

    impl Default for BrowserPopup {
        fn default() -> Self {
            Self {
                poll_interval: Duration::from_millis(250),
            }
        }
    }

    impl BrowserPopup {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Popup for BrowserPopup {
        async fn authorize(&self, url: &str, redirect_uri: &str) -> Result<CallbackParams, AuthError> {
            let window = web_sys::window().ok_or_else(AuthError::popup_blocked)?;
            let popup = window
                .open_with_url_and_target_and_features(url, POPUP_NAME, POPUP_FEATURES)
                .map_err(|_| AuthError::popup_blocked())?
                .ok_or_else(AuthError::popup_blocked)?;

            loop {
                gloo_timers::future::sleep(self.poll_interval).await;

                if popup.closed().unwrap_or(true) {
                    return Err(AuthError::popup_closed());
                }
                // Reading the location throws while the popup is on the provider's origin.
                let Ok(href) = popup.location().href() else {
                    continue;
                };
                if href.starts_with(redirect_uri) {
                    let _ = popup.close();
                    return CallbackParams::from_redirect(&href);
                }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use loopback::LoopbackPopup;

#[cfg(not(target_arch = "wasm32"))]
mod loopback {
    use std::time::Duration;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use url::Url;

    use super::{CallbackParams, Popup};
    use crate::error::AuthError;

    const DONE_PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nConnection: close\r\n\r\n<html><body><p>Sign-in complete. You can close this window.</p></body></html>";
    const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

    type Opener = Box<dyn Fn(&str) -> std::io::Result<()>>;

    /// System browser plus a one-shot HTTP listener on the redirect address.
    pub struct LoopbackPopup {
        timeout: Duration,
        opener: Opener,
    }

    impl Default for LoopbackPopup {
        fn default() -> Self {
            Self::new(Duration::from_secs(300))
        }
    }

    impl LoopbackPopup {
        pub fn new(timeout: Duration) -> Self {
            Self {
                timeout,
                opener: Box::new(|url: &str| open::that(url)),
            }
        }

        /// Replace the browser launcher.
        pub fn with_opener(mut self, opener: impl Fn(&str) -> std::io::Result<()> + 'static) -> Self {
            self.opener = Box::new(opener);
            self
        }
    }

    impl Popup for LoopbackPopup {
        async fn authorize(&self, url: &str, redirect_uri: &str) -> Result<CallbackParams, AuthError> {
            let redirect = Url::parse(redirect_uri).map_err(AuthError::internal)?;
            let host = redirect.host_str().unwrap_or("127.0.0.1").to_string();
            let port = redirect.port_or_known_default().unwrap_or(80);

            let listener = TcpListener::bind((host.as_str(), port)).await.map_err(|e| {
                tracing::error!("Failed to bind loopback redirect {host}:{port}: {e}");
                AuthError::popup_blocked()
            })?;

            if let Err(e) = (self.opener)(url) {
                tracing::error!("Failed to open browser: {}", e);
                return Err(AuthError::popup_blocked());
            }

            match tokio::time::timeout(self.timeout, accept_callback(&listener, redirect.path())).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(timeout_secs = self.timeout.as_secs(), "sign-in window timed out");
                    Err(AuthError::popup_closed())
                }
            }
        }
    }

    /// Serve requests until one hits the redirect path.
    async fn accept_callback(listener: &TcpListener, path: &str) -> Result<CallbackParams, AuthError> {
        loop {
            let (mut stream, _) = listener.accept().await.map_err(AuthError::internal)?;
            let (read_half, mut write_half) = stream.split();

            let mut request_line = String::new();
            BufReader::new(read_half)
                .read_line(&mut request_line)
                .await
                .map_err(AuthError::internal)?;

            // "GET /auth/callback?code=...&state=... HTTP/1.1"
            let target = request_line.split_whitespace().nth(1).unwrap_or("/");
            let Ok(url) = Url::parse(&format!("http://localhost{target}")) else {
                let _ = write_half.write_all(NOT_FOUND.as_bytes()).await;
                continue;
            };
            if url.path() != path {
                let _ = write_half.write_all(NOT_FOUND.as_bytes()).await;
                continue;
            }

            let _ = write_half.write_all(DONE_PAGE.as_bytes()).await;
            let _ = write_half.shutdown().await;
            return CallbackParams::from_url(&url);
        }
    }
}
