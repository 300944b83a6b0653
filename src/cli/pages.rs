//! Read-only page commands: status, server, video, logs and upgrade.

use crate::api::{AdminApi, LogEntry, LogScope, Release, ServerConfig, ServerStatus, VideoSettings};
use crate::cli::output::{format_page_footer, to_json};
use crate::cli::{JsonArgs, LogsArgs};
use crate::views::logs::{logs_view, render_logs_table, LOGS_PAGE_SIZE};
use crate::views::overview::{outbound_details, render_overview, OutboundDetail};
use crate::views::server::render_server_page;
use crate::views::upgrade::{is_newer_release, render_release};
use crate::views::video::render_video_settings;
use crate::views::SortOrder;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    status: &'a ServerStatus,
    outbound: Vec<OutboundDetail>,
    warnings: &'a [LogEntry],
}

/// Recent warnings are best effort; the overview still renders without them.
async fn recent_warnings(api: &dyn AdminApi) -> Vec<LogEntry> {
    match api.logs(LogScope::Warnings).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch recent warnings");
            Vec::new()
        }
    }
}

/// Handle `castctl status`
pub async fn handle_status(api: &dyn AdminApi, args: &JsonArgs) -> anyhow::Result<String> {
    let status = api.status().await?;
    let config = api.server_config().await?;
    let warnings = recent_warnings(api).await;

    if args.json {
        let outbound = match &status.broadcaster {
            Some(b) => outbound_details(
                &config.video_settings.video_quality_variants,
                &b.stream_details,
            ),
            None => Vec::new(),
        };
        return to_json(&StatusReport {
            status: &status,
            outbound,
            warnings: &warnings,
        });
    }

    Ok(render_overview(&status, &config, &warnings, Utc::now()))
}

/// Handle `castctl server`
pub async fn handle_server(api: &dyn AdminApi, args: &JsonArgs) -> anyhow::Result<String> {
    let config: ServerConfig = api.server_config().await?;
    if args.json {
        return to_json(&config);
    }
    Ok(render_server_page(&config))
}

/// Handle `castctl video`
pub async fn handle_video(api: &dyn AdminApi, args: &JsonArgs) -> anyhow::Result<String> {
    let settings: VideoSettings = api.server_config().await?.video_settings;
    if args.json {
        return to_json(&settings);
    }
    Ok(render_video_settings(&settings))
}

/// Handle `castctl logs`
pub async fn handle_logs(api: &dyn AdminApi, args: &LogsArgs) -> anyhow::Result<String> {
    let scope = if args.warnings {
        LogScope::Warnings
    } else {
        LogScope::All
    };
    let entries = api.logs(scope).await?;

    let mut view = logs_view(args.limit.unwrap_or(LOGS_PAGE_SIZE));
    if !args.levels.is_empty() {
        let values = args.levels.iter().map(|l| l.as_str().to_string()).collect();
        view.set_filter("level", values)?;
    }
    if args.ascending {
        view.sort_by("time", SortOrder::Ascending)?;
    }

    let page = view.page(&entries, args.page.max(1) - 1)?;
    if args.json {
        return to_json(&page.items);
    }

    match render_logs_table(&page.items) {
        Some(table) => Ok(format!(
            "{}\n{}",
            table,
            format_page_footer(page.page, page.page_count, page.total)
        )),
        None => Ok("No log entries.".to_string()),
    }
}

#[derive(Debug, Serialize)]
struct UpgradeReport<'a> {
    current_version: Option<&'a str>,
    update_available: bool,
    release: &'a Release,
}

/// Handle `castctl upgrade`
pub async fn handle_upgrade(api: &dyn AdminApi, args: &JsonArgs) -> anyhow::Result<String> {
    let release = api.latest_release().await?;
    let status = match api.status().await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch server version");
            None
        }
    };

    let current = status
        .as_ref()
        .filter(|s| !s.disable_upgrade_checks)
        .map(|s| s.version_number.as_str());
    let update_available = current.is_some_and(|v| is_newer_release(v, &release.name));

    if args.json {
        return to_json(&UpgradeReport {
            current_version: status.as_ref().map(|s| s.version_number.as_str()),
            update_available,
            release: &release,
        });
    }

    let page = render_release(&release);
    match current {
        Some(version) if update_available => Ok(format!(
            "{}\n\n{}",
            format!("A new version is available (running {}).", version)
                .yellow()
                .bold(),
            page
        )),
        _ => Ok(page),
    }
}
