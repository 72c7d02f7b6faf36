//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

/// All failure modes of the engine.
///
/// "Word not found" and "word without etymology" are not errors — they are
/// ordinary outcomes carried by [`crate::types::Outcome`]. Errors here mean
/// the store, the filesystem, or a raw dump is actually broken.
#[derive(Debug, Error)]
pub enum EtymographError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed dump {path} at line {line}: {message}")]
    Ingest {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, EtymographError>;
