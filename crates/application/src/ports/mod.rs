//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod auth_api;
mod clock;
mod key_value_store;

pub use auth_api::{AuthApi, AuthApiError};
pub use clock::Clock;
pub use key_value_store::{KeyValueStore, StoreError};
