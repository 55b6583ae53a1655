//! Client Settings Domain Model
//!
//! Where the backend lives and where the session is kept.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for talking to the token-issuing backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the backend, e.g. `https://api.example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the login (issuing) endpoint.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Path of the refresh endpoint.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Path of the logout endpoint.
    #[serde(default = "default_logout_path")]
    pub logout_path: String,

    /// File holding the persisted session. Falls back to the platform data
    /// directory when unset.
    #[serde(default)]
    pub session_file: Option<PathBuf>,

    /// Connect timeout for backend calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

fn default_refresh_path() -> String {
    "/api/auth/refresh".to_string()
}

fn default_logout_path() -> String {
    "/api/auth/logout".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            logout_path: default_logout_path(),
            session_file: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientSettings {
    /// Creates settings pointing at the given backend with default paths.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = ClientSettings::default();
        assert_eq!(settings.login_path, "/api/auth/login");
        assert_eq!(settings.refresh_path, "/api/auth/refresh");
        assert_eq!(settings.logout_path, "/api/auth/logout");
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.session_file.is_none());
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: ClientSettings =
            serde_json::from_str(r#"{"base_url":"https://api.example.com"}"#)
                .unwrap_or_default();
        assert_eq!(settings.base_url, "https://api.example.com");
        assert_eq!(settings.login_path, "/api/auth/login");
    }
}
