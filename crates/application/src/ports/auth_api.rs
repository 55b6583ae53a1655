//! Auth backend port
//!
//! The three endpoints of the token-issuing backend.

use async_trait::async_trait;
use warden_domain::{Credentials, TokenPair};

/// Errors returned by the backend port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthApiError {
    /// The backend answered with a non-success status.
    #[error("request rejected with HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// The backend answered with success but the body was empty or unreadable.
    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Port for the token-issuing backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a token pair.
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AuthApiError>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthApiError>;

    /// Tells the backend the session is over. Callers ignore the outcome.
    async fn logout(&self) -> Result<(), AuthApiError>;
}
