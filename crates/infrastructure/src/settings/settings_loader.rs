//! Client settings from a TOML file overlaid by environment variables.
//!
//! Lookup order, later sources winning:
//! 1. built-in defaults
//! 2. the config file (`--config`, else `<config_dir>/warden/config.toml`)
//! 3. `WARDEN_*` environment variables, e.g. `WARDEN_BASE_URL`

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use warden_domain::ClientSettings;

use crate::persistence::FileStore;

/// Environment variable prefix.
const ENV_PREFIX: &str = "WARDEN";

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The sources could not be read or merged.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// No session file was configured and no data directory exists.
    #[error("could not determine a location for the session file")]
    NoSessionPath,
}

/// Loads `ClientSettings`.
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    environment: Option<Environment>,
}

impl SettingsLoader {
    /// Creates a loader using the default config file and process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an explicit config file, which then must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Replaces the environment source.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Returns the default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("warden").join("config.toml"))
    }

    /// Loads and validates the settings.
    ///
    /// The session file is resolved to the platform default when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed, an explicit config file is
    /// missing, the base URL is invalid or no session path can be found.
    pub fn load(self) -> Result<ClientSettings, SettingsError> {
        let mut builder = Config::builder();

        match self.file {
            Some(path) => builder = builder.add_source(toml_file(&path, true)),
            None => {
                if let Some(path) = Self::default_config_path() {
                    builder = builder.add_source(toml_file(&path, false));
                }
            }
        }

        let environment = self
            .environment
            .unwrap_or_else(|| Environment::with_prefix(ENV_PREFIX));
        builder = builder.add_source(environment.try_parsing(true));

        let mut settings: ClientSettings = builder.build()?.try_deserialize()?;
        validate_base_url(&settings.base_url)?;

        if settings.session_file.is_none() {
            let path = FileStore::default_path().ok_or(SettingsError::NoSessionPath)?;
            settings.session_file = Some(path);
        }

        tracing::debug!(base_url = %settings.base_url, "settings loaded");
        Ok(settings)
    }
}

fn toml_file(path: &Path, required: bool) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml).required(required)
}

fn validate_base_url(base_url: &str) -> Result<(), SettingsError> {
    match url::Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(SettingsError::InvalidBaseUrl(base_url.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_file_then_environment() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"https://file.example.com\"\nlogin_path = \"/login\"\nsession_file = \"/tmp/s.json\"\n",
        )
        .unwrap();

        let settings = SettingsLoader::new()
            .with_file(&path)
            .with_environment(env(&[
                ("WARDEN_BASE_URL", "https://env.example.com"),
                ("WARDEN_TIMEOUT_SECS", "5"),
            ]))
            .load()
            .unwrap();

        assert_eq!(settings.base_url, "https://env.example.com");
        assert_eq!(settings.login_path, "/login");
        assert_eq!(settings.refresh_path, "/api/auth/refresh");
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.session_file, Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = SettingsLoader::new()
            .with_file(dir.path().join("absent.toml"))
            .with_environment(env(&[]))
            .load();
        assert!(matches!(result, Err(SettingsError::Config(_))));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let result = SettingsLoader::new()
            .with_file(&path)
            .with_environment(env(&[("WARDEN_BASE_URL", "ftp://example.com")]))
            .load();
        assert!(matches!(result, Err(SettingsError::InvalidBaseUrl(_))));
    }
}
