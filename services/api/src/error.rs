//! Custom error types for the backend client

use reqwest::StatusCode;
use thiserror::Error;

/// Custom error type for backend calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Missing or rejected bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Token accepted but the role may not perform the call
    #[error("Forbidden")]
    Forbidden,

    /// Resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The client could not be built
    #[error("Invalid client configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Map a non-success status and its body to an error
    pub fn from_status(status: StatusCode, path: &str, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => ApiError::NotFound(path.to_string()),
            _ => ApiError::Status {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string()
                } else {
                    body
                },
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
