//! Overview page: online card, stream details, server config card and recent
//! warnings, or the offline notice.

use super::logs::{logs_view, render_logs_table, OVERVIEW_LOGS_PAGE_SIZE};
use crate::api::{LogEntry, ServerConfig, ServerStatus, StreamDetails, VideoVariant};
use crate::widgets::Statistic;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fmt::Write;

/// Strip the port; loopback addresses read as `Localhost`.
pub fn format_ip_address(remote_addr: &str) -> String {
    let host = match remote_addr.rsplit_once(':') {
        Some((host, _port)) if !host.is_empty() => host,
        _ => remote_addr,
    };
    if host == "[::1]" || host == "127.0.0.1" {
        "Localhost".to_string()
    } else {
        host.to_string()
    }
}

pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

fn or_unknown<T: PartialEq + Default + ToString>(value: T) -> String {
    if value == T::default() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

fn text_or_unknown(value: &str) -> String {
    if value.is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

/// What one output rendition actually sends.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OutboundDetail {
    pub title: String,
    pub video: String,
    pub audio: String,
}

/// Outbound details per variant. Passthrough settings report the inbound
/// stream's values.
pub fn outbound_details(variants: &[VideoVariant], inbound: &StreamDetails) -> Vec<OutboundDetail> {
    let numbered = variants.len() > 1;
    variants
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            let audio = if variant.audio_passthrough {
                format!(
                    "{}, {} kbps",
                    text_or_unknown(&inbound.audio_codec),
                    inbound.audio_bitrate
                )
            } else {
                format!("{} kbps", or_unknown(variant.audio_bitrate))
            };

            let video = if variant.video_passthrough {
                format!(
                    "{} kbps, {} fps {} x {}",
                    or_unknown(inbound.video_bitrate),
                    inbound.framerate,
                    inbound.width,
                    inbound.height
                )
            } else {
                format!(
                    "{} kbps, {} fps",
                    or_unknown(variant.video_bitrate),
                    variant.framerate
                )
            };

            let title = if numbered {
                format!("Outbound Stream Details {}", index + 1)
            } else {
                "Outbound Stream Details".to_string()
            };

            OutboundDetail { title, video, audio }
        })
        .collect()
}

/// Inbound video lines: codec and bitrate, framerate, resolution.
pub fn inbound_video_lines(details: &StreamDetails) -> Vec<String> {
    let framerate = if details.framerate == 0.0 {
        "Unknown".to_string()
    } else {
        details.framerate.to_string()
    };
    vec![
        format!(
            "{} @ {} kbps",
            text_or_unknown(&details.video_codec),
            or_unknown(details.video_bitrate)
        ),
        format!("{} fps", framerate),
        format!("{} x {}", details.width, details.height),
    ]
}

pub fn inbound_audio_line(details: &StreamDetails) -> String {
    format!(
        "{}, {} kbps",
        details.audio_codec,
        or_unknown(details.audio_bitrate)
    )
}

/// The full overview. Without a broadcaster the offline notice is shown.
pub fn render_overview(
    status: &ServerStatus,
    config: &ServerConfig,
    warnings: &[LogEntry],
    now: DateTime<Utc>,
) -> String {
    let Some(broadcaster) = &status.broadcaster else {
        return render_offline(status, config, warnings);
    };
    let details = &broadcaster.stream_details;

    let mut output = String::new();
    let elapsed = (now - broadcaster.time).num_seconds().max(0) as u64;

    writeln!(output, "{}", "Stream is online".green().bold()).unwrap();
    let started = format!(
        "Stream started {}",
        broadcaster.time.format("%b %-d, %Y %-I:%M %p UTC")
    );
    for stat in [
        Statistic::new(started, format_duration(elapsed)).with_prefix("⏱"),
        Statistic::new("Viewers", status.viewer_count).with_prefix("👤"),
        Statistic::new("Peak viewer count", status.session_peak_viewer_count).with_prefix("👤"),
    ] {
        writeln!(output, "{}", stat.render()).unwrap();
    }

    for detail in outbound_details(&config.video_settings.video_quality_variants, details) {
        writeln!(output, "\n{}", detail.title.bold()).unwrap();
        writeln!(output, "{}", Statistic::new("Outbound Video Stream", detail.video).render())
            .unwrap();
        writeln!(output, "{}", Statistic::new("Outbound Audio Stream", detail.audio).render())
            .unwrap();
    }

    let encoder = if details.encoder.is_empty() {
        "Unknown encoder"
    } else {
        details.encoder.as_str()
    };
    writeln!(output, "\n{}", "Inbound Stream Details".bold()).unwrap();
    let input = format!("{} {}", encoder, format_ip_address(&broadcaster.remote_addr));
    writeln!(output, "{}", Statistic::new("Input", input).render()).unwrap();
    writeln!(output, "{}", "Inbound Video Stream".dimmed()).unwrap();
    for line in inbound_video_lines(details) {
        writeln!(output, "  • {}", line).unwrap();
    }
    writeln!(
        output,
        "{}",
        Statistic::new("Inbound Audio Stream", inbound_audio_line(details)).render()
    )
    .unwrap();

    output.push_str(&render_config_card(config));
    output.push_str(&render_recent_warnings(warnings));
    output
}

fn render_config_card(config: &ServerConfig) -> String {
    let mut output = String::new();
    writeln!(output, "\n{}", "Server Config".bold()).unwrap();
    writeln!(output, "{}", Statistic::new("Stream key", config.stream_key.as_str()).render())
        .unwrap();
    writeln!(
        output,
        "{}",
        Statistic::new(
            "Directory registration enabled",
            config.yp.enabled.to_string()
        )
        .render()
    )
    .unwrap();
    output
}

fn render_recent_warnings(warnings: &[LogEntry]) -> String {
    let page = match logs_view(OVERVIEW_LOGS_PAGE_SIZE).page(warnings, 0) {
        Ok(page) => page,
        Err(_) => return String::new(),
    };
    match render_logs_table(&page.items) {
        Some(table) => format!("\n{}\n{}\n", "Logs".bold(), table),
        None => String::new(),
    }
}

/// Shown while nobody is streaming: how to start, plus recent warnings.
pub fn render_offline(status: &ServerStatus, config: &ServerConfig, warnings: &[LogEntry]) -> String {
    let mut output = String::new();
    let state = if status.online {
        "No stream is active".yellow().bold()
    } else {
        "Server is offline".red().bold()
    };
    writeln!(output, "{}", state).unwrap();
    writeln!(
        output,
        "Point your broadcasting software at rtmp://<host>:{}/live",
        if config.rtmp_server_port == 0 {
            1935
        } else {
            config.rtmp_server_port
        }
    )
    .unwrap();
    writeln!(output, "and use your stream key to start streaming.").unwrap();
    writeln!(
        output,
        "Overall peak viewer count: {}",
        status.overall_peak_viewer_count
    )
    .unwrap();
    output.push_str(&render_recent_warnings(warnings));
    output
}
