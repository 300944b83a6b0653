//! Latest release page: changelog and downloadable assets.

use crate::api::{Asset, Release};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Bytes as megabytes with two decimals.
pub fn format_asset_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Plain-text rendering of a markdown changelog for the terminal.
pub fn markdown_to_text(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut output = String::new();
    let mut list_depth: usize = 0;
    let mut ordered: Vec<Option<u64>> = Vec::new();
    let mut heading: Option<HeadingLevel> = None;
    let mut link: Option<String> = None;

    for event in Parser::new_ext(input, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(level);
                if !output.is_empty() && !output.ends_with("\n\n") {
                    output.push('\n');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                heading = None;
                output.push_str("\n\n");
            }
            Event::Start(Tag::List(start)) => {
                list_depth += 1;
                ordered.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                ordered.pop();
                if list_depth == 0 {
                    output.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                match ordered.last_mut() {
                    Some(Some(n)) => {
                        output.push_str(&format!("{}. ", n));
                        *n += 1;
                    }
                    _ => output.push_str("• "),
                }
            }
            Event::End(TagEnd::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            Event::End(TagEnd::Paragraph) => {
                output.push('\n');
                if list_depth == 0 {
                    output.push('\n');
                }
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                link = Some(dest_url.to_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(url) = link.take() {
                    output.push_str(&format!(" ({})", url));
                }
            }
            Event::Text(text) => match heading {
                Some(_) => output.push_str(&text.bold().to_string()),
                None => output.push_str(&text),
            },
            Event::Code(code) => output.push_str(&format!("`{}`", code)),
            Event::SoftBreak | Event::HardBreak => output.push('\n'),
            Event::Rule => output.push_str("────────\n\n"),
            Event::TaskListMarker(done) => output.push_str(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    output.trim_end().to_string()
}

pub fn render_assets_table(assets: &[Asset]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Size", "Download"]);

    for asset in assets {
        table.add_row(vec![
            Cell::new(&asset.name),
            Cell::new(format_asset_size(asset.size)),
            Cell::new(&asset.browser_download_url),
        ]);
    }

    table.to_string()
}

/// Release name, date, changelog and downloads.
pub fn render_release(release: &Release) -> String {
    let mut sections = vec![format!("{}  {}", release.name.bold(), release.html_url.dimmed())];
    if let Some(created) = release.created_at {
        sections.push(created.format("%a %b %d %Y").to_string());
    }
    if !release.body.is_empty() {
        sections.push(markdown_to_text(&release.body));
    }
    sections.push(format!("{}\n{}", "Downloads".bold(), render_assets_table(&release.assets)));
    sections.join("\n\n")
}

fn version_triple(version: &str) -> Option<(u64, u64, u64)> {
    let version = version.trim().trim_start_matches(['v', 'V']);
    let mut parts = version
        .split(|c: char| !c.is_ascii_digit())
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>().ok());
    let major = parts.next()??;
    let minor = parts.next().flatten().unwrap_or(0);
    let patch = parts.next().flatten().unwrap_or(0);
    Some((major, minor, patch))
}

/// Whether `release_name` is a newer version than `current`. Names that do
/// not look like versions never count as newer.
pub fn is_newer_release(current: &str, release_name: &str) -> bool {
    match (version_triple(current), version_triple(release_name)) {
        (Some(current), Some(latest)) => latest > current,
        _ => false,
    }
}
