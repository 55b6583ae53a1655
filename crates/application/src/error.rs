//! Application error types

use thiserror::Error;
use warden_domain::DomainError;

use crate::ports::StoreError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The issuing endpoint refused the credentials.
    #[error("credentials rejected (HTTP {status})")]
    CredentialsRejected {
        /// HTTP status returned by the backend.
        status: u16,
    },

    /// The backend answered with success but no usable token pair.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// The backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// A session store operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
