//! Read-only projections of fetched data into terminal tables and text.
//!
//! [`table`] holds the generic sortable/filterable [`ListView`]; the other
//! modules are the concrete pages built on it and on the widgets.

pub mod chat;
mod error;
pub mod logs;
pub mod overview;
pub mod server;
pub mod table;
pub mod upgrade;
pub mod video;

pub use error::ViewError;
pub use table::{Column, FilterOption, FilterOptions, ListView, Page, Row, SortOrder};
