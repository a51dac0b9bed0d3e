//! Error type for the persistence layer.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the JSON files under the data directory.
///
/// Persist failures are never fatal: callers log them and the in-memory
/// state keeps serving the current session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
