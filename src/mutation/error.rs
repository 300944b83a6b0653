//! Error types for mutation flows.

use crate::api::ApiError;
use crate::context::ContextError;
use thiserror::Error;

/// Why a mutation did not take effect.
///
/// By the time one of these is returned the issuing site has already recorded
/// the outcome, so callers only need to report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Local validation failed; no request was sent.
    #[error("{0}")]
    Invalid(String),

    /// The server answered but reported failure.
    #[error("{0}")]
    Rejected(String),

    /// The request never got a usable answer.
    #[error(transparent)]
    Transport(#[from] ApiError),

    /// A previous submission on the same site has not completed yet.
    #[error("Another change is still being submitted")]
    Busy,

    /// Bulk action requested with nothing selected.
    #[error("No messages selected")]
    NothingSelected,

    #[error("No chat message with id {0}")]
    UnknownMessage(String),

    #[error("No entry at index {index} (there are {len})")]
    OutOfRange { index: usize, len: usize },

    /// The server accepted the change but it could not be merged locally.
    #[error("Change saved but not applied locally: {0}")]
    Context(#[from] ContextError),

    /// The owning view was unmounted while the request was in flight.
    #[error("View was closed before the change completed")]
    Detached,
}
