//! Clock port for expiry checks

use chrono::{DateTime, Utc};

/// Port for reading the caller's local time.
///
/// Token expiry is derived and checked against this clock, never against
/// server time. Tests substitute a manual clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
