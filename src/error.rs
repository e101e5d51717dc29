// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MinerError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: Box<MinerError>,
    },
}

impl MinerError {
    pub fn catalog(msg: impl Into<String>) -> Self {
        MinerError::Catalog(msg.into())
    }
}
