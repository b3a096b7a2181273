//! Infoblox client errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfobloxError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Infoblox API error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
