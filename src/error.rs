//! Error types shared across the crate.

use thiserror::Error;

/// Errors raised by the persistent error-count store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying SQLite database failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The stored value could not be encoded or decoded.
    #[error("invalid stored value: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The state directory could not be created.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading a word list.
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse word list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown built-in word list: {0}")]
    UnknownList(String),

    #[error("word list {0} has no word pairs")]
    Empty(String),
}

/// Errors raised when talking to the remote document store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The store could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The store answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Network(e.to_string())
        }
    }
}
