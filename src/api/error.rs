//! Errors reported by the service collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the classification service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the service
    #[error("Connection failed: {0}")]
    Connection(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// The service answered with a non-success status
    #[error("Service error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The file to upload is not a recognisable image
    #[error("'{path}' is not a supported image: {reason}")]
    InvalidImage { path: PathBuf, reason: String },

    /// A configured credential cannot be sent as an HTTP header
    #[error("Invalid {header} value: {source}")]
    InvalidHeader {
        header: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Short error type string for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Connection(_) => "connection_error",
            ApiError::Timeout { .. } => "request_timeout",
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::Decode(_) => "decode_error",
            ApiError::InvalidImage { .. } => "invalid_image",
            ApiError::InvalidHeader { .. } => "invalid_header",
            ApiError::Io { .. } => "io_error",
        }
    }
}
