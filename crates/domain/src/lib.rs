//! Warden Domain - Core session types
//!
//! This crate defines the domain model for the Warden session client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod settings;

pub use auth::{
    AUTH_TOKEN_KEY, Claims, ClaimsError, Credentials, Principal, REFRESH_TOKEN_KEY,
    SESSION_KEYS, SessionState, StoredSession, TOKEN_EXPIRY_KEY, TokenPair, decode_claims,
    token_preview,
};
pub use error::{DomainError, DomainResult};
pub use settings::ClientSettings;
