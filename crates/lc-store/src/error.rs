use std::io;
use std::path::{Path, PathBuf};

use lc_core::UpsertError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Upsert(#[from] UpsertError),

    #[error("no card for term '{term}' in language '{lang}'")]
    CardNotFound { term: String, lang: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Adapter for `map_err` that attaches the path being touched.
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
