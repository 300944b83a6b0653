//! Chat message list.

use super::table::{Column, FilterOption, FilterOptions, ListView, Row, SortOrder};
use crate::api::ChatMessage;
use chrono::{DateTime, Local, TimeZone};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

pub const CHAT_PAGE_SIZE: usize = 100;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex must compile"));

impl Row for ChatMessage {
    fn row_key(&self) -> String {
        self.id.clone()
    }
}

fn visibility_value(message: &ChatMessage) -> String {
    message.visible.to_string()
}

/// Time (newest first), user, message and visibility columns.
pub fn chat_view() -> ListView<ChatMessage> {
    ListView::new(vec![
        Column::new("timestamp", "Time")
            .sortable(|a: &ChatMessage, b: &ChatMessage| a.timestamp.cmp(&b.timestamp))
            .default_sort(SortOrder::Descending),
        Column::new("author", "User")
            .sortable(|a: &ChatMessage, b: &ChatMessage| {
                a.author
                    .to_lowercase()
                    .cmp(&b.author.to_lowercase())
                    .then_with(|| a.author.cmp(&b.author))
            })
            .filterable(|m: &ChatMessage| m.author.clone(), FilterOptions::Derived),
        Column::new("body", "Message"),
        Column::new("visible", "").filterable(
            visibility_value,
            FilterOptions::Fixed(vec![
                FilterOption::new("Visible messages", "true"),
                FilterOption::new("Hidden messages", "false"),
            ]),
        ),
    ])
    .with_page_size(CHAT_PAGE_SIZE)
}

/// e.g. `Oct 6, 2020 9:25:09 PM`
pub fn format_chat_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%b %-d, %Y %-I:%M:%S %p").to_string()
}

/// Plain text of an HTML message body.
pub fn strip_html(body: &str) -> String {
    let text = TAG_RE.replace_all(body, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// JSON shape of a listed message.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatRowView {
    pub id: String,
    pub time: String,
    pub author: String,
    pub message: String,
    pub visible: bool,
    pub selected: bool,
}

impl ChatRowView {
    pub fn new(message: &ChatMessage, selected: bool) -> Self {
        Self {
            id: message.id.clone(),
            time: message.timestamp.to_rfc3339(),
            author: message.author.clone(),
            message: strip_html(&message.body),
            visible: message.visible,
            selected,
        }
    }
}

/// Table of messages; hidden rows are dimmed and selected rows marked.
pub fn render_chat_table(rows: &[&ChatMessage], selection: &[String]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "ID", "Time", "User", "Message", "Visible"]);

    for message in rows {
        let selected = selection.iter().any(|id| *id == message.id);
        let mark = if selected { "■" } else { "" };
        let time = format_chat_time(&message.timestamp.with_timezone(&Local));
        let body = strip_html(&message.body);
        let (body, visible) = if message.visible {
            (body, "visible".green().to_string())
        } else {
            (body.dimmed().to_string(), "hidden".yellow().to_string())
        };

        table.add_row(vec![
            Cell::new(mark),
            Cell::new(&message.id),
            Cell::new(time),
            Cell::new(&message.author),
            Cell::new(body),
            Cell::new(visible),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(id: &str, author: &str, second: u32, visible: bool) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            author: author.to_string(),
            body: format!("<p>hi <b>{}</b></p>", author),
            timestamp: Utc.with_ymd_and_hms(2020, 10, 6, 21, 25, second).unwrap(),
            visible,
            kind: "CHAT".to_string(),
        }
    }

    fn sample() -> Vec<ChatMessage> {
        vec![
            message("a", "zed", 1, true),
            message("b", "Amy", 3, false),
            message("c", "bob", 2, true),
            message("d", "amy", 3, true),
        ]
    }

    #[test]
    fn test_newest_first_by_default_with_stable_ties() {
        let rows = sample();
        let keys = chat_view().row_keys(&rows);
        assert_eq!(keys, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_author_options_sorted_case_insensitively() {
        let rows = sample();
        let options = chat_view().filter_options("author", &rows).unwrap();
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["Amy", "amy", "bob", "zed"]);
    }

    #[test]
    fn test_visibility_filter() {
        let rows = sample();
        let mut view = chat_view();
        view.set_filter("visible", vec!["false".to_string()]).unwrap();
        assert_eq!(view.row_keys(&rows), vec!["b"]);

        let options = view.filter_options("visible", &rows).unwrap();
        assert_eq!(options[0].label, "Visible messages");
        assert_eq!(options[1].value, "false");
    }

    #[test]
    fn test_author_filter_is_exact() {
        let rows = sample();
        let mut view = chat_view();
        view.set_filter("author", vec!["amy".to_string()]).unwrap();
        assert_eq!(view.row_keys(&rows), vec!["d"]);
    }

    #[test]
    fn test_format_chat_time() {
        let time = Utc.with_ymd_and_hms(2020, 10, 6, 21, 25, 9).unwrap();
        assert_eq!(format_chat_time(&time), "Oct 6, 2020 9:25:09 PM");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <a href=\"x\">there</a> &amp; welcome</p>\n<br/>"),
            "Hello there & welcome"
        );
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn test_render_marks_selection() {
        let rows = sample();
        let refs: Vec<&ChatMessage> = rows.iter().collect();
        let output = render_chat_table(&refs, &["c".to_string()]);
        assert!(output.contains("■"));
        assert!(output.contains("hidden"));
        assert!(output.contains("hi bob"));
    }
}
