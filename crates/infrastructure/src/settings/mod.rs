//! Settings loading from file and environment.

mod settings_loader;

pub use settings_loader::{SettingsError, SettingsLoader};
