//! Token pair issued by the backend on login or refresh.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// Access token plus refresh token as returned by the issuing endpoint.
///
/// Backends differ in casing, so PascalCase and the long-form names are
/// accepted on input. Output always uses camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// The short-lived bearer token.
    #[serde(rename = "token", alias = "Token", alias = "accessToken", alias = "AccessToken")]
    pub access_token: String,
    /// The long-lived token exchanged for a new pair.
    #[serde(alias = "RefreshToken")]
    pub refresh_token: String,
    /// Expiry of the refresh token. Received but not consulted, so an
    /// unreadable value is dropped rather than failing the whole pair.
    #[serde(
        default,
        alias = "RefreshTokenExpiry",
        deserialize_with = "lenient_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token_expiry: Option<DateTime<Utc>>,
    /// Lifetime of the access token in seconds.
    #[serde(alias = "ExpiresIn", alias = "expiresInSeconds", alias = "ExpiresInSeconds")]
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a token pair without a refresh-token expiry.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            refresh_token_expiry: None,
            expires_in,
        }
    }

    /// Derives the access-token expiry instant from the issue time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLifetime` if `expires_in` is negative or
    /// the resulting instant is out of range.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DomainResult<DateTime<Utc>> {
        if self.expires_in < 0 {
            return Err(DomainError::InvalidLifetime(self.expires_in));
        }
        Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or(DomainError::InvalidLifetime(self.expires_in))
    }
}

/// Reads an instant with or without an offset. Naive values are taken as UTC.
fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let text = raw.as_ref().and_then(serde_json::Value::as_str);
    Ok(text.and_then(|value| {
        DateTime::parse_from_rfc3339(value)
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

/// Returns a short preview of a token that is safe to log.
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.chars().count() > 12 {
        let head: String = token.chars().take(8).collect();
        format!("{head}...")
    } else {
        token.to_string()
    }
}
