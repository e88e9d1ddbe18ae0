//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{BackendUrls, Environment};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backends: BackendsConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend origins
#[derive(Debug, Clone, Deserialize)]
pub struct BackendsConfig {
    #[serde(default)]
    pub environment: Environment,

    /// Overrides the environment's backend 1 origin
    pub primary_url: Option<String>,

    /// Overrides the environment's backend 2 origin
    pub secondary_url: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            primary_url: None,
            secondary_url: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BackendsConfig {
    /// Resolved origins: explicit URLs win over the environment's defaults
    pub fn urls(&self) -> BackendUrls {
        let defaults = BackendUrls::for_environment(self.environment);
        BackendUrls::new(
            self.primary_url.clone().unwrap_or(defaults.primary),
            self.secondary_url.clone().unwrap_or(defaults.secondary),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where the terminal client keeps its token
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: String,
}

fn default_session_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("logscope").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./.logscope_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("logscope").join("config.toml")),
            Some(PathBuf::from("./logscope.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(env) = lookup("LOGSCOPE_ENV") {
            match env.parse() {
                Ok(env) => self.backends.environment = env,
                Err(e) => tracing::warn!("Ignoring LOGSCOPE_ENV: {}", e),
            }
        }
        if let Some(url) = lookup("LOGSCOPE_BACKEND1_URL") {
            self.backends.primary_url = Some(url);
        }
        if let Some(url) = lookup("LOGSCOPE_BACKEND2_URL") {
            self.backends.secondary_url = Some(url);
        }

        if let Some(file) = lookup("LOGSCOPE_SESSION_FILE") {
            self.session.file = file;
        }

        if let Some(level) = lookup("LOGSCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOGSCOPE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Logscope Configuration
#
# Environment variables override these settings:
# - LOGSCOPE_ENV
# - LOGSCOPE_BACKEND1_URL
# - LOGSCOPE_BACKEND2_URL
# - LOGSCOPE_SESSION_FILE
# - LOGSCOPE_LOG_LEVEL
# - LOGSCOPE_LOG_FORMAT

[backends]
# development (localhost:5001 / localhost:5002) or production
environment = "development"

# Explicit origins, including the /api prefix
# primary_url = "https://server1.example.com/api"
# secondary_url = "https://server2.example.com/api"

# Request timeout in seconds
request_timeout_secs = 10

[session]
# File holding the session token
# file = "~/.local/share/logscope/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.backends.environment, Environment::Development);
        assert_eq!(config.backends.request_timeout_secs, 10);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.backends.urls(), BackendUrls::default());
    }

    #[test]
    fn test_explicit_urls_win() {
        let config = Config::parse(
            r#"
            [backends]
            environment = "production"
            secondary_url = "https://logs2.internal/api"
            "#,
        )
        .unwrap();

        let urls = config.backends.urls();
        assert_eq!(urls.primary, crate::api::PROD_PRIMARY_URL);
        assert_eq!(urls.secondary, "https://logs2.internal/api");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LOGSCOPE_ENV", "prod"),
            ("LOGSCOPE_BACKEND1_URL", "http://127.0.0.1:9000/api"),
            ("LOGSCOPE_SESSION_FILE", "/tmp/s.json"),
            ("LOGSCOPE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.backends.environment, Environment::Production);
        assert_eq!(config.backends.urls().primary, "http://127.0.0.1:9000/api");
        assert_eq!(config.session.file, "/tmp/s.json");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_env_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "LOGSCOPE_ENV").then(|| "staging".to_string()));
        assert_eq!(config.backends.environment, Environment::Development);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.backends.request_timeout_secs, 10);

        std::fs::write(&path, "[logging\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));
    }
}
