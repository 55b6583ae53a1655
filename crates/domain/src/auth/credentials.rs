//! Login credentials

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{DomainError, DomainResult};

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Credentials submitted to the issuing endpoint.
///
/// Created per login attempt and never persisted.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// The account email address.
    pub email: String,
    /// The account password.
    pub password: String,
}

impl Credentials {
    /// Creates a new set of credentials without validating them.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks that the email looks like an email and the password is present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` or `DomainError::EmptyPassword`.
    pub fn validate(&self) -> DomainResult<()> {
        let email_ok = EMAIL_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(&self.email));
        if !email_ok {
            return Err(DomainError::InvalidEmail(self.email.clone()));
        }
        if self.password.is_empty() {
            return Err(DomainError::EmptyPassword);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
