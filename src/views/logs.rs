//! Server log list.

use super::table::{Column, FilterOption, FilterOptions, ListView, Row, SortOrder};
use crate::api::{LogEntry, LogLevel};
use chrono::{DateTime, Local, TimeZone};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::fmt::Display;

pub const LOGS_PAGE_SIZE: usize = 20;
pub const OVERVIEW_LOGS_PAGE_SIZE: usize = 5;

impl Row for LogEntry {
    fn row_key(&self) -> String {
        self.time.to_rfc3339()
    }
}

fn level_value(entry: &LogEntry) -> String {
    entry.level.as_str().to_string()
}

/// Level, timestamp (newest first) and message columns.
pub fn logs_view(page_size: usize) -> ListView<LogEntry> {
    ListView::new(vec![
        Column::new("level", "Level").filterable(
            level_value,
            FilterOptions::Fixed(vec![
                FilterOption::new("Info", LogLevel::Info.as_str()),
                FilterOption::new("Warning", LogLevel::Warning.as_str()),
                FilterOption::new("Error", LogLevel::Error.as_str()),
            ]),
        ),
        Column::new("time", "Timestamp")
            .sortable(|a: &LogEntry, b: &LogEntry| a.time.cmp(&b.time))
            .default_sort(SortOrder::Descending),
        Column::new("message", "Message"),
    ])
    .with_page_size(page_size)
}

/// e.g. `9:25 PM 10/06/2020`
pub fn format_log_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%-I:%M %p %m/%d/%Y").to_string()
}

fn colored_level(level: LogLevel) -> String {
    match level {
        LogLevel::Warning => level.as_str().yellow().to_string(),
        LogLevel::Error => level.as_str().red().to_string(),
        _ => level.as_str().to_string(),
    }
}

/// Log table, or `None` when there is nothing to show.
pub fn render_logs_table(rows: &[&LogEntry]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Level", "Timestamp", "Message"]);

    for entry in rows {
        table.add_row(vec![
            Cell::new(colored_level(entry.level)),
            Cell::new(format_log_time(&entry.time.with_timezone(&Local))),
            Cell::new(&entry.message),
        ]);
    }

    Some(table.to_string())
}
