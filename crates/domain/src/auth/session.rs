//! Persisted session layout and derived session state.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::auth::token::TokenPair;
use crate::error::{DomainError, DomainResult};

/// Store key holding the access token.
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Store key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Store key holding the access-token expiry as an RFC 3339 instant.
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";

/// Every key the session occupies in the store.
pub const SESSION_KEYS: [&str; 3] = [AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRY_KEY];

/// The three values a session occupies in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    /// Current access token.
    pub auth_token: String,
    /// Current refresh token.
    pub refresh_token: String,
    /// Instant at which the access token stops being valid.
    pub token_expiry: DateTime<Utc>,
}

impl StoredSession {
    /// Builds the session to persist for a freshly issued pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair's lifetime is invalid.
    pub fn from_pair(pair: &TokenPair, issued_at: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            auth_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            token_expiry: pair.expires_at(issued_at)?,
        })
    }

    /// Rebuilds a session from raw store slots.
    ///
    /// Returns `None` unless all three slots are present, non-blank, and the
    /// expiry parses.
    #[must_use]
    pub fn from_slots(
        auth_token: Option<String>,
        refresh_token: Option<String>,
        token_expiry: Option<String>,
    ) -> Option<Self> {
        let auth_token = auth_token.filter(|t| !t.trim().is_empty())?;
        let refresh_token = refresh_token.filter(|t| !t.trim().is_empty())?;
        let token_expiry = parse_expiry(token_expiry.as_deref()?).ok()?;
        Some(Self {
            auth_token,
            refresh_token,
            token_expiry,
        })
    }

    /// Returns the slots as `(key, value)` pairs in store order.
    #[must_use]
    pub fn to_slots(&self) -> [(&'static str, String); 3] {
        [
            (AUTH_TOKEN_KEY, self.auth_token.clone()),
            (REFRESH_TOKEN_KEY, self.refresh_token.clone()),
            (TOKEN_EXPIRY_KEY, format_expiry(self.token_expiry)),
        ]
    }

    /// True when `now` has reached the expiry. Equality counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.token_expiry, now)
    }

    /// Seconds left before expiry, clamped at zero.
    #[must_use]
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.token_expiry - now).num_seconds().max(0)
    }
}

/// Compares an expiry with the current time. Equality counts as expired.
#[must_use]
pub fn is_expired(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expiry
}

/// Formats an expiry the way it is persisted.
#[must_use]
pub fn format_expiry(expiry: DateTime<Utc>) -> String {
    expiry.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a persisted expiry.
///
/// # Errors
///
/// Returns `DomainError::InvalidExpiry` if the value is not an RFC 3339 instant.
pub fn parse_expiry(value: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidExpiry(value.to_string()))
}

/// Lifecycle state of the client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session is stored.
    Unauthenticated,
    /// A session is stored and its access token has not expired.
    Authenticated,
    /// The access token has expired and a refresh is due.
    ExpiredPendingRefresh,
    /// The last refresh was rejected by the backend.
    RefreshFailed,
}

impl SessionState {
    /// Derives the state from what is stored and the current time.
    #[must_use]
    pub fn evaluate(session: Option<&StoredSession>, now: DateTime<Utc>) -> Self {
        match session {
            None => Self::Unauthenticated,
            Some(session) if session.is_expired_at(now) => Self::ExpiredPendingRefresh,
            Some(_) => Self::Authenticated,
        }
    }

    /// Returns true if outgoing requests can be authorized right now.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Get a user-friendly message.
    #[must_use]
    pub const fn message(&self) -> &str {
        match self {
            Self::Unauthenticated => "Not signed in",
            Self::Authenticated => "Signed in",
            Self::ExpiredPendingRefresh => "Session expired, refresh pending",
            Self::RefreshFailed => "Session refresh was rejected",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn session(expiry: DateTime<Utc>) -> StoredSession {
        StoredSession {
            auth_token: "a.b.c".to_string(),
            refresh_token: "r1".to_string(),
            token_expiry: expiry,
        }
    }

    #[test]
    fn test_expiry_equality_counts_as_expired() {
        let s = session(noon());
        assert!(s.is_expired_at(noon()));
        assert!(s.is_expired_at(noon() + Duration::seconds(1)));
        assert!(!s.is_expired_at(noon() - Duration::seconds(1)));
    }

    #[test]
    fn test_slots_roundtrip_through_strings() {
        let s = session(noon());
        let [(_, token), (_, refresh), (_, expiry)] = s.to_slots();
        assert_eq!(expiry, "2026-03-01T12:00:00.000Z");

        let restored = StoredSession::from_slots(Some(token), Some(refresh), Some(expiry));
        assert_eq!(restored, Some(s));
    }

    #[test]
    fn test_partial_slots_are_not_a_session() {
        let slot = |value: &str| Some(value.to_string());
        let expiry = "2026-03-01T12:00:00Z";

        assert_eq!(
            StoredSession::from_slots(slot("t"), None, slot(expiry)),
            None
        );
        assert_eq!(
            StoredSession::from_slots(slot("t"), slot("r"), slot("tomorrow")),
            None
        );
        assert_eq!(
            StoredSession::from_slots(slot("  "), slot("r"), slot(expiry)),
            None
        );
    }

    #[test]
    fn test_parse_expiry_accepts_offsets() {
        let parsed = parse_expiry("2026-03-01T14:00:00+02:00").unwrap();
        assert_eq!(parsed, noon());
        assert!(parse_expiry("not a date").is_err());
    }

    #[test]
    fn test_from_pair_derives_expiry() {
        let pair = TokenPair::new("t", "r", 90);
        let s = StoredSession::from_pair(&pair, noon()).unwrap();
        assert_eq!(s.token_expiry, noon() + Duration::seconds(90));
        assert_eq!(s.seconds_remaining(noon()), 90);
        assert_eq!(s.seconds_remaining(noon() + Duration::hours(1)), 0);
    }

    #[test]
    fn test_state_evaluation() {
        assert_eq!(SessionState::evaluate(None, noon()), SessionState::Unauthenticated);

        let valid = session(noon() + Duration::minutes(5));
        assert_eq!(
            SessionState::evaluate(Some(&valid), noon()),
            SessionState::Authenticated
        );

        let expired = session(noon());
        assert_eq!(
            SessionState::evaluate(Some(&expired), noon()),
            SessionState::ExpiredPendingRefresh
        );
        assert!(!SessionState::RefreshFailed.is_authenticated());
    }
}
