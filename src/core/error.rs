//! Custom error types for the page helpers.
//!
//! - [`ApiError`] - request helper failures (transport, HTTP status, decoding)
//! - [`StoreError`] - localStorage write/remove failures

use thiserror::Error;

/// Network/fetch-related errors for API requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Browser window not available
    #[error("Browser window not available")]
    NoWindow,
    /// Failed to create the HTTP request
    #[error("Failed to create request: {0}")]
    RequestBuild(String),
    /// Network request failed (DNS, CORS, connection reset, ...)
    #[error("Network error: {0}")]
    Transport(String),
    /// Non-2xx response; the body is discarded
    #[error("HTTP {0}")]
    Status(u16),
    /// Failed to read the response body
    #[error("Failed to read response: {0}")]
    ResponseRead(String),
    /// Response body is not the expected JSON
    #[error("JSON parse error: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status carried by a [`ApiError::Status`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Persisted key-value errors. Reads never fail, so only writes show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// localStorage not available.
    #[error("localStorage not available")]
    Unavailable,
    /// Value could not be represented as JSON.
    #[error("failed to serialize value: {0}")]
    Serialize(String),
    /// Backend rejected the write (quota exceeded, private mode, ...).
    #[error("failed to save to localStorage: {0}")]
    Write(String),
    /// Backend rejected the removal.
    #[error("failed to remove from localStorage: {0}")]
    Remove(String),
}
