use thiserror::Error;

/// Failures raised by a [`KeyValueStore`](crate::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot be reached (no `window`, storage disabled, quota exceeded, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    #[error("malformed session data: {0}")]
    Serde(#[from] serde_json::Error),
}
