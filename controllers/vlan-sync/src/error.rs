//! Sync-specific error types.

use device42_client::Device42Error;
use infoblox_client::InfobloxError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while exporting or importing.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Device42 API error
    #[error("Device42 error: {0}")]
    Device42(#[from] Device42Error),

    /// Infoblox API error
    #[error("Infoblox error: {0}")]
    Infoblox(#[from] InfobloxError),

    /// Reading or writing a data file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file did not hold the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}
