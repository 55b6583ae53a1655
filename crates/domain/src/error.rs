//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The email address does not look like an email.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// A stored expiry instant could not be parsed.
    #[error("invalid expiry timestamp: {0}")]
    InvalidExpiry(String),

    /// A token lifetime was negative or out of range.
    #[error("invalid token lifetime: {0} seconds")]
    InvalidLifetime(i64),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
