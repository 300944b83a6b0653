//! Presentation widgets. Pure functions of their inputs.

pub mod chart;
pub mod key_value;
pub mod statistic;

pub use chart::{create_graph_dataset, render_chart, sparkline, Series};
pub use key_value::{render_key_value_table, KeyValue};
pub use statistic::{Progress, StatValue, Statistic};
