//! Claims decoding and the principal derived from an access token.
//!
//! Only the payload segment of the token is read. The signature is never
//! checked, so this must only be fed tokens obtained directly from the
//! trusted issuing endpoint.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::value::RawValue;
use thiserror::Error;

/// Claims as name/value pairs, ordered by name.
pub type Claims = BTreeMap<String, String>;

/// Reasons a token payload could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// The token is not three dot-separated segments.
    #[error("expected 3 token segments, found {0}")]
    SegmentCount(usize),

    /// The payload segment is not valid base64.
    #[error("payload is not valid base64: {0}")]
    Base64(String),

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(String),

    /// The payload is JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Decodes the claims carried in a token's payload segment.
///
/// Numbers keep their literal text, strings are unquoted, `null` becomes an
/// empty string and nested arrays or objects keep their JSON text.
///
/// # Errors
///
/// Returns a `ClaimsError` if the token is malformed at any step.
pub fn decode_claims(token: &str) -> Result<Claims, ClaimsError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClaimsError::SegmentCount(segments.len()));
    }

    let bytes = decode_segment(segments[1])?;
    let raw: &RawValue =
        serde_json::from_slice(&bytes).map_err(|e| ClaimsError::Json(e.to_string()))?;
    if !raw.get().starts_with('{') {
        return Err(ClaimsError::NotAnObject);
    }

    let entries: BTreeMap<String, &RawValue> =
        serde_json::from_str(raw.get()).map_err(|e| ClaimsError::Json(e.to_string()))?;

    entries
        .into_iter()
        .map(|(name, value)| claim_text(value).map(|text| (name, text)))
        .collect()
}

/// Base64-decodes a segment after restoring its padding.
///
/// Accepts both the URL-safe and the standard alphabet.
fn decode_segment(segment: &str) -> Result<Vec<u8>, ClaimsError> {
    let mut normalized: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    match normalized.len() % 4 {
        2 => normalized.push_str("=="),
        3 => normalized.push('='),
        1 => {
            return Err(ClaimsError::Base64(format!(
                "invalid length {}",
                segment.len()
            )));
        }
        _ => {}
    }

    STANDARD
        .decode(normalized.as_bytes())
        .map_err(|e| ClaimsError::Base64(e.to_string()))
}

fn claim_text(value: &RawValue) -> Result<String, ClaimsError> {
    let text = value.get();
    match text.as_bytes().first() {
        Some(b'"') => {
            serde_json::from_str::<String>(text).map_err(|e| ClaimsError::Json(e.to_string()))
        }
        Some(b'n') => Ok(String::new()),
        // numbers, booleans, arrays and objects keep their literal text
        _ => Ok(text.to_string()),
    }
}

/// Identity view derived from the current access token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Principal {
    claims: Claims,
    authenticated: bool,
}

impl Principal {
    /// The principal used whenever no usable token is present.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// An authenticated principal carrying the given claims.
    #[must_use]
    pub const fn authenticated(claims: Claims) -> Self {
        Self {
            claims,
            authenticated: true,
        }
    }

    /// Derives a principal from a token, failing closed.
    ///
    /// Blank tokens and tokens that cannot be decoded yield the
    /// unauthenticated principal.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        Self::try_from_token(token).unwrap_or_default()
    }

    /// Derives a principal from a token, reporting decoding failures.
    ///
    /// A blank token yields the unauthenticated principal.
    ///
    /// # Errors
    ///
    /// Returns the decoding error for a non-blank malformed token.
    pub fn try_from_token(token: &str) -> Result<Self, ClaimsError> {
        if token.trim().is_empty() {
            return Ok(Self::unauthenticated());
        }
        decode_claims(token).map(Self::authenticated)
    }

    /// True iff the principal was derived from a non-empty, decodable token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// All claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }

    /// A single claim value by name.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).map(String::as_str)
    }

    /// The subject (`sub`) claim.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.claim("sub")
    }
}
