use std::path::PathBuf;

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure. Load failures are recoverable (empty store); save failures are not.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed storage document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage document must be a JSON object keyed by \"<ClassName>.<id>\"")]
    NotAnObject,
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
