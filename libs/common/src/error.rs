//! Custom error types for the common library
//!
//! This module defines the error types shared by the client crates for
//! token persistence and configuration loading.

use thiserror::Error;

/// Custom error type for token storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred while reading or writing the token file
    #[error("Token storage I/O error: {0}")]
    Io(#[source] std::io::Error),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Configuration load error: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
