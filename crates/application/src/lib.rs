//! Warden Application - Session lifecycle and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the store, the backend and the clock)
//! - The token lifecycle manager and the authentication state provider
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;

pub use auth::{AuthenticationStateProvider, RequestAuthorization, TokenLifecycleManager};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{AuthApi, AuthApiError, Clock, KeyValueStore, StoreError};
