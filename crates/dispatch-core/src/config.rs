//! Configuration management for the voice dispatch console

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Console presentation configuration
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to, including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Console presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Number of notifications kept before the oldest is dropped
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// `chrono` format string for timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_notification_capacity() -> usize {
    5
}

fn default_timestamp_format() -> String {
    crate::format::DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            notification_capacity: default_notification_capacity(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether events should be emitted as JSON
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from an optional file and the environment
    ///
    /// Without an explicit path, `dispatch.{toml,yaml,json}` in the working
    /// directory is read when present. `DISPATCH__API__BASE_URL` style
    /// variables override file values.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Self::load`], reading `DISPATCH__*` overrides from `env`
    /// instead of the process environment when it is given
    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("dispatch").required(false),
        };
        debug!(
            file = ?path,
            env_override = env.is_some(),
            "loading configuration"
        );

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("DISPATCH")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        debug!(base_url = %config.api.base_url, "configuration loaded");
        Ok(config)
    }

    /// Check values serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> crate::Result<()> {
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(crate::Error::Configuration {
                message: format!("api.base_url must be an http(s) URL, got '{base}'"),
            });
        }
        if self.console.notification_capacity == 0 {
            return Err(crate::Error::Configuration {
                message: "console.notification_capacity must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(!config.logging.is_json());
        assert_eq!(config.console.notification_capacity, 5);
        assert_eq!(config.console.timestamp_format, "%Y-%m-%d %H:%M:%S");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "api": {"base_url": "https://dispatch.example.com/api"},
            "logging": {"format": "json"}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.api.base_url, "https://dispatch.example.com/api");
        assert_eq!(config.logging.level, "info"); // Uses default
        assert!(config.logging.is_json());
        assert_eq!(config.console.notification_capacity, 5); // Uses default
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://10.0.0.5:9000/api\"\n\n[console]\nnotification_capacity = 2"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.api.base_url, "http://10.0.0.5:9000/api");
        assert_eq!(config.console.notification_capacity, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://10.0.0.5:9000/api\"").unwrap();

        let env = config::Map::from([(
            "DISPATCH__API__BASE_URL".to_string(),
            "https://dispatch.example.com/api".to_string(),
        )]);
        let config = Config::load_with_env(Some(file.path()), Some(env)).unwrap();

        assert_eq!(config.api.base_url, "https://dispatch.example.com/api");
        assert_eq!(config.console.notification_capacity, 5);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let result = Config::load(Some(&missing));
        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.console.notification_capacity = 0;
        assert!(config.validate().is_err());
    }
}
