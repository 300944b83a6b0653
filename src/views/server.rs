//! Server details page: instance details, server configuration, social
//! handles and extra page content.

use crate::api::{ServerConfig, SocialHandle};
use crate::widgets::key_value::{render_key_value_table, KeyValue};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

pub fn instance_details(config: &ServerConfig) -> Vec<KeyValue> {
    let details = &config.instance_details;
    vec![
        KeyValue::new("Server name", &details.name),
        KeyValue::new("Title", &details.title),
        KeyValue::new("Summary", &details.summary),
        KeyValue::new("Logo", &details.logo),
        KeyValue::new("Tags", details.tags.join(", ")),
        KeyValue::new("NSFW", details.nsfw),
        KeyValue::new("Shows in directory", config.yp.enabled),
    ]
}

pub fn server_configuration(config: &ServerConfig) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Stream key", &config.stream_key),
        KeyValue::new("ffmpeg path", &config.ffmpeg_path),
        KeyValue::new("Web server port", config.web_server_port),
        KeyValue::new("RTMP server port", config.rtmp_server_port),
        KeyValue::new("S3 storage enabled", config.s3.enabled),
    ]
}

pub fn render_social_handles(handles: &[SocialHandle]) -> Option<String> {
    if handles.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Platform", "URL"]);
    for handle in handles {
        table.add_row(vec![Cell::new(&handle.platform), Cell::new(&handle.url)]);
    }

    Some(format!("{}\n{}", "Social Handles".bold(), table))
}

/// All sections; empty optional sections are left out.
pub fn render_server_page(config: &ServerConfig) -> String {
    let mut sections = vec![
        render_key_value_table("Server details", &instance_details(config)),
        render_key_value_table("Server configuration", &server_configuration(config)),
    ];

    if let Some(handles) = render_social_handles(&config.instance_details.social_handles) {
        sections.push(handles);
    }

    let content = config.instance_details.extra_page_content.trim();
    if !content.is_empty() {
        sections.push(format!("{}\n{}", "Page content".bold(), content));
    }

    sections.join("\n\n")
}
