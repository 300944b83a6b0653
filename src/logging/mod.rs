//! Tracing setup for the console.
//!
//! Logs are written to stderr so tables and JSON on stdout can be piped.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build filter directives string from LoggingConfig
///
/// Produces the base level followed by any component-specific levels, in
/// the format `base_level,castctl::component1=level1,...`, components in
/// name order.
///
/// # Examples
///
/// ```
/// use castctl::config::{LogFormat, LoggingConfig};
/// use castctl::logging::build_filter_directives;
///
/// let mut config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     ..LoggingConfig::default()
/// };
/// config
///     .component_levels
///     .insert("context".to_string(), "debug".to_string());
///
/// assert_eq!(build_filter_directives(&config), "info,castctl::context=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    for (component, level) in &config.component_levels {
        filter_str.push_str(&format!(",castctl::{}={}", component, level));
    }

    filter_str
}

/// Initialize tracing based on configuration
///
/// `RUST_LOG` takes precedence over the configured directives.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}
