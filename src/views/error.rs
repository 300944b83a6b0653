//! Error types for list views and widgets.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column '{0}' cannot be sorted")]
    NotSortable(String),

    #[error("Column '{0}' cannot be filtered")]
    NotFilterable(String),

    #[error("Page {page} is out of range (there are {pages})")]
    PageOutOfRange { page: usize, pages: usize },

    /// A widget that needs a number was given something else.
    #[error("{0} requires a numeric value")]
    NotNumeric(String),
}
