//! Error types for admin API requests.

use thiserror::Error;

/// Errors that can occur while talking to the admin API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Server answered with a non-success status.
    #[error("Server error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Response body doesn't match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The client could not be constructed from its configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Classify a reqwest error into an ApiError.
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(timeout_ms)
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
