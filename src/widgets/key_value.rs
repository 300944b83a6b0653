//! Titled two-column name/value table.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KeyValue {
    pub name: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(name: impl Into<String>, value: impl Display) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

pub fn render_key_value_table(title: &str, rows: &[KeyValue]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Value"]);

    for row in rows {
        table.add_row(vec![Cell::new(&row.name), Cell::new(&row.value)]);
    }

    format!("{}\n{}", title.bold(), table)
}
