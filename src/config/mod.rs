//! Configuration module for castctl
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`CASTCTL_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use castctl::config::CastctlConfig;
//!
//! let config = CastctlConfig::default();
//! assert_eq!(config.polling.status_interval_seconds, 5);
//!
//! let toml = r#"
//! [connection]
//! base_url = "https://stream.example.com"
//! "#;
//! let config: CastctlConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.connection.base_url, "https://stream.example.com");
//! ```

pub mod connection;
pub mod error;
pub mod logging;
pub mod polling;

pub use connection::ConnectionConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Example configuration written by `castctl config init`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../castctl.example.toml");

/// Unified configuration for the console.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CastctlConfig {
    /// Streaming server location and credentials
    pub connection: ConnectionConfig,
    /// Poll intervals and outcome reset timing
    pub polling: PollingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl CastctlConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("CASTCTL_URL") {
            self.connection.base_url = url;
        }
        if let Ok(username) = std::env::var("CASTCTL_USERNAME") {
            self.connection.username = username;
        }
        if let Ok(password) = std::env::var("CASTCTL_PASSWORD") {
            self.connection.password = password;
        }
        if let Ok(interval) = std::env::var("CASTCTL_POLL_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.polling.status_interval_seconds = secs;
            }
        }

        if let Ok(level) = std::env::var("CASTCTL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CASTCTL_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match reqwest::Url::parse(&self.connection.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(ConfigError::Validation {
                    field: "connection.base_url".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                })
            }
            Err(e) => {
                return Err(ConfigError::Validation {
                    field: "connection.base_url".to_string(),
                    message: e.to_string(),
                })
            }
        }

        if self.connection.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "connection.request_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        for (field, value) in [
            (
                "polling.status_interval_seconds",
                self.polling.status_interval_seconds,
            ),
            (
                "polling.chat_interval_seconds",
                self.polling.chat_interval_seconds,
            ),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "interval must be non-zero".to_string(),
                });
            }
        }

        self.logging.validate()
    }
}
