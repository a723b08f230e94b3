//! Error types for the core crate.

use thiserror::Error;

/// Why a playlist could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Http(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no playlist selected")]
    NoSource,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("state file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("player binary `{0}` not found")]
    NotFound(String),
    #[error("failed to start player: {0}")]
    Spawn(#[from] std::io::Error),
}
