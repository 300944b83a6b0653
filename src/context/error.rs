//! Error types for the shared server context.

use thiserror::Error;

/// Errors from merging a confirmed change into the cached config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A path segment does not name an object in the config.
    #[error("unknown config path: {0}")]
    UnknownPath(String),

    /// The target object has no such field; the key set never changes.
    #[error("unknown config field '{field}' at '{path}'")]
    UnknownField { path: String, field: String },

    /// The value does not fit the field's type.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}
