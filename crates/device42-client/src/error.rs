//! Device42 client errors

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when interacting with the Device42 API
#[derive(Debug, Error)]
pub enum Device42Error {
    /// HTTP transport error (connection, TLS, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Device42 answered with a non-success status
    #[error("Device42 API error: {status} - {body}")]
    Status {
        /// HTTP status returned by Device42
        status: StatusCode,
        /// Raw response body
        body: String,
    },

    /// Authentication failed (bad credentials, insufficient permissions)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A POST/PUT was accepted over HTTP but Device42 reported a non-zero return code
    #[error("Device42 returned an error code: {0}")]
    ReturnCode(String),

    /// The Device42 license has expired
    #[error("License expired: {0}")]
    LicenseExpired(String),

    /// The Device42 license does not cover the requested feature
    #[error("License insufficient: {0}")]
    LicenseInsufficient(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid request (e.g., payload that cannot be form-encoded)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or malformed client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Device42Error {
    /// Whether the error is a transport failure worth retrying
    ///
    /// Device42 resets connections when it is flooded with requests. Those
    /// surface as connect or request-send failures; anything carrying a
    /// response status is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Device42Error::Http(e) => e.is_connect() || (e.is_request() && e.status().is_none()),
            _ => false,
        }
    }
}
