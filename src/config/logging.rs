//! `[logging]` section: base level, per-module overrides and output format.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Level names accepted by the tracing filter.
pub const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Crate modules that can be given their own level.
pub const COMPONENTS: [&str; 6] = ["api", "cli", "context", "mutation", "views", "widgets"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Diagnostics go to stderr; `warn` keeps one-shot commands quiet unless
/// something goes wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels keyed by module name, e.g. `context = "debug"`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_levels: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            component_levels: BTreeMap::new(),
        }
    }
}

fn check_level(field: String, level: &str) -> Result<(), ConfigError> {
    if LEVELS.contains(&level.to_lowercase().as_str()) {
        return Ok(());
    }
    Err(ConfigError::Validation {
        field,
        message: format!("unknown level '{}', use one of: {}", level, LEVELS.join(", ")),
    })
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_level("logging.level".to_string(), &self.level)?;

        for (component, level) in &self.component_levels {
            let field = format!("logging.component_levels.{}", component);
            if !COMPONENTS.contains(&component.as_str()) {
                return Err(ConfigError::Validation {
                    field,
                    message: format!("unknown module, use one of: {}", COMPONENTS.join(", ")),
                });
            }
            check_level(field, level)?;
        }

        Ok(())
    }
}
