//! Error types for the booking views

use api::ApiError;
use auth::{SessionError, validation::ValidationError};
use thiserror::Error;

/// Custom error type for booking workflows and views
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A form field failed a client-side check
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Command input could not be used
    #[error("{0}")]
    InvalidInput(String),

    /// The booking is too close to be edited by the client
    #[error("{message}")]
    EditWindowClosed { days_left: i64, message: String },

    #[error("You need to log in first")]
    NotAuthenticated,

    /// The token carries no user id, so client-scoped calls are impossible
    #[error("The current session carries no user id")]
    MissingIdentity,

    #[error("Only administrators can do this")]
    Forbidden,

    #[error("Booking not found")]
    NotFound,

    /// A destructive step was attempted without its confirmation
    #[error("Confirmation required")]
    ConfirmationRequired,

    #[error("Login failed")]
    LoginFailed(#[source] ApiError),

    #[error("Registration failed. The e-mail may already be in use.")]
    RegistrationFailed(#[source] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for WorkflowError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotFound(_) => WorkflowError::NotFound,
            ApiError::Forbidden => WorkflowError::Forbidden,
            other => WorkflowError::Api(other),
        }
    }
}

/// Type alias for workflow results
pub type WorkflowResult<T> = Result<T, WorkflowError>;
