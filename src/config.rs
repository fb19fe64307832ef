//! Application configuration.
//!
//! Settings layer in order of precedence: command-line flags, then
//! `WHODAT_*` environment variables (a `.env` file is honored), then the
//! config file, then built-in defaults.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Config file consulted when no `--config` flag is given.
pub const DEFAULT_CONFIG_FILE: &str = "whodat.toml";

/// Application configuration for the session client.
#[derive(Debug, Clone, Getters, Deserialize)]
pub struct AppConfig {
    /// Base URL of the guessing game service.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Path to the SQLite session database.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Request timeout for service calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_db_path() -> String {
    "whodat.db".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            db_path: default_db_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads configuration with the full layering applied.
    ///
    /// An explicit `path` must exist; the default config file is
    /// consulted only when present. Environment variables override file
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit config file cannot be
    /// loaded.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Overrides settings from `WHODAT_*` environment variables.
    #[instrument(skip(self))]
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("WHODAT_SERVER_URL") {
            debug!("Server URL taken from environment");
            self.server_url = url;
        }
        if let Ok(path) = std::env::var("WHODAT_DB_PATH") {
            debug!("Database path taken from environment");
            self.db_path = path;
        }
        if let Ok(secs) = std::env::var("WHODAT_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
        {
            debug!(secs, "Timeout taken from environment");
            self.timeout_secs = secs;
        }
    }

    /// Applies command-line overrides on top of the loaded settings.
    #[instrument(skip_all)]
    pub fn with_overrides(mut self, server_url: Option<String>, db_path: Option<String>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(path) = db_path {
            self.db_path = path;
        }
        self
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_url(), "http://127.0.0.1:8000");
        assert_eq!(config.db_path(), "whodat.db");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: AppConfig =
            toml::from_str("server_url = \"http://game.local:9000\"").expect("toml should parse");
        assert_eq!(config.server_url(), "http://game.local:9000");
        assert_eq!(config.db_path(), "whodat.db");
    }

    #[test]
    fn test_overrides_win() {
        let config = AppConfig::default()
            .with_overrides(Some("http://override:1234".to_string()), None);
        assert_eq!(config.server_url(), "http://override:1234");
        assert_eq!(config.db_path(), "whodat.db");
    }
}
