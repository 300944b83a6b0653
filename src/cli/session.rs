//! Resolving configuration and building the API client for a command.

use crate::api::{AdminApi, AdminClient};
use crate::cli::GlobalArgs;
use crate::config::{CastctlConfig, ConfigError};
use std::path::Path;
use std::sync::Arc;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "castctl.toml";

/// File, then `CASTCTL_*` environment, then command-line flags.
///
/// An explicitly named file must exist; a missing default file just means
/// defaults.
pub fn resolve_config(args: &GlobalArgs) -> Result<CastctlConfig, ConfigError> {
    let config = match &args.config {
        Some(path) => CastctlConfig::load(Some(path))?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                CastctlConfig::load(Some(default))?
            } else {
                CastctlConfig::default()
            }
        }
    };

    let mut config = config.with_env_overrides();
    if let Some(url) = &args.url {
        config.connection.base_url = url.clone();
    }
    if let Some(username) = &args.username {
        config.connection.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.connection.password = password.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

pub fn connect(config: &CastctlConfig) -> anyhow::Result<Arc<dyn AdminApi>> {
    let client = AdminClient::new(&config.connection)?;
    tracing::debug!(base_url = %client.base_url(), "Admin client ready");
    Ok(Arc::new(client))
}
