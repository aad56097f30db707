//! Error types for the session layer

use common::error::StorageError;
use thiserror::Error;

/// Custom error type for session operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// The token could not be decoded into user claims
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// The token could not be persisted or removed
    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Type alias for Result with SessionError
pub type SessionResult<T> = Result<T, SessionError>;
