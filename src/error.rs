//! Crate error type
//!
//! Gameplay never fails; only the adapters around it (files, output streams)
//! can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown game '{0}' (expected one of: zones, runner, hoops, moto)")]
    UnknownGame(String),
}

pub type Result<T> = std::result::Result<T, Error>;
