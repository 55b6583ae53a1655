//! Warden Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod persistence;
pub mod serialization;
pub mod settings;

pub use adapters::{HttpAuthApi, HttpSetupError, SystemClock};
pub use persistence::{FileStore, MemoryStore};
pub use serialization::{SerializationError, SessionDocument, decode_document, encode_document};
pub use settings::{SettingsError, SettingsLoader};
