//! Session authentication for the Warden client.
//!
//! This module provides:
//! - The token lifecycle manager (login, refresh on expiry, logout)
//! - The authentication state provider (principal + change notification)
//! - The shared outgoing-request authorization slot

mod authorization;
mod lifecycle;
mod state_provider;
#[cfg(test)]
mod test_support;

pub use authorization::RequestAuthorization;
pub use lifecycle::TokenLifecycleManager;
pub use state_provider::AuthenticationStateProvider;
