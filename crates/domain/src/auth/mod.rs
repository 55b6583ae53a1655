//! Authentication domain types

mod claims;
mod credentials;
mod session;
mod token;

pub use claims::{Claims, ClaimsError, Principal, decode_claims};
pub use credentials::Credentials;
pub use session::{
    AUTH_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, SessionState, StoredSession,
    TOKEN_EXPIRY_KEY, format_expiry, is_expired, parse_expiry,
};
pub use token::{TokenPair, token_preview};
