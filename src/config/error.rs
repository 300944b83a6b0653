//! Errors raised while resolving `castctl.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A value parsed but is unusable, e.g. a zero poll interval.
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}
