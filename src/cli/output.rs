//! Output formatting helpers for CLI commands

use crate::mutation::{MutationPhase, SiteStatus};
use colored::Colorize;
use serde::Serialize;

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One-line rendering of a mutation outcome.
pub fn format_outcome(status: &SiteStatus) -> String {
    let message = status.message.as_deref().unwrap_or_default();
    match status.phase {
        MutationPhase::Succeeded => format!("{} {}", "✓".green(), message),
        MutationPhase::Failed => format!("{} {}", "✗".red(), message.red()),
        MutationPhase::Submitting => format!("{} {}", "…".yellow(), "Submitting".yellow()),
        MutationPhase::Idle => message.to_string(),
    }
}

/// Footer under a paged table.
pub fn format_page_footer(page: usize, page_count: usize, total: usize) -> String {
    format!("Page {} of {} ({} total)", page + 1, page_count.max(1), total)
        .dimmed()
        .to_string()
}
