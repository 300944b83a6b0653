//! Live status view
//!
//! Mounts the polling context and redraws a summary with a viewer chart every
//! time a poll lands, until Ctrl-C.

use crate::api::{AdminApi, ServerStatus, TimedValue};
use crate::cli::WatchArgs;
use crate::config::PollingConfig;
use crate::context::ServerContext;
use crate::views::overview::format_duration;
use crate::widgets::{render_chart, Progress, Statistic};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::collections::VecDeque;
use std::fmt::Write;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Samples kept for the viewer chart.
pub const HISTORY_CAPACITY: usize = 120;

/// Ring buffer of viewer counts, oldest first.
pub struct ViewerHistory {
    samples: RwLock<VecDeque<TimedValue>>,
    capacity: usize,
}

impl ViewerHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Record the viewer count of `status`, evicting the oldest sample at
    /// capacity.
    pub fn record(&self, status: &ServerStatus, time: DateTime<Utc>) {
        let Ok(mut samples) = self.samples.write() else {
            return;
        };
        if samples.len() >= self.capacity {
            samples.pop_front();
        }
        samples.push_back(TimedValue {
            time,
            value: status.viewer_count as f64,
        });
    }

    pub fn samples(&self) -> Vec<TimedValue> {
        self.samples
            .read()
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.samples.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ViewerHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

/// One redraw: state line, viewer statistics and the chart.
pub fn render_watch_frame(status: &ServerStatus, history: &[TimedValue], now: DateTime<Utc>) -> String {
    let mut output = String::new();

    match &status.broadcaster {
        Some(broadcaster) => {
            let elapsed = (now - broadcaster.time).num_seconds().max(0) as u64;
            writeln!(
                output,
                "{}  {}",
                "● Live".green().bold(),
                format_duration(elapsed)
            )
            .unwrap();
        }
        None if status.online => {
            writeln!(output, "{}", "○ No stream is active".yellow().bold()).unwrap()
        }
        None => writeln!(output, "{}", "○ Server is offline".red().bold()).unwrap(),
    }

    writeln!(
        output,
        "{}",
        Statistic::new("Viewers", status.viewer_count).with_prefix("👤").render()
    )
    .unwrap();
    writeln!(
        output,
        "{}",
        Statistic::new("Peak viewer count", status.session_peak_viewer_count).render()
    )
    .unwrap();

    if status.session_peak_viewer_count > 0 {
        let share = status.viewer_count as f64 / status.session_peak_viewer_count as f64 * 100.0;
        if let Ok(progress) = Progress::new("Of session peak", share) {
            writeln!(output, "{}", progress.render()).unwrap();
        }
    }

    writeln!(output).unwrap();
    output.push_str(&render_chart("Viewers", "viewers", history, &[]));
    output
}

/// Poll `api` every `interval`, handing a rendered frame to `on_frame` after
/// each status update, until `stop` resolves. Returns the number of frames.
pub async fn watch_until<F>(
    api: Arc<dyn AdminApi>,
    interval: Duration,
    stop: F,
    mut on_frame: impl FnMut(String),
) -> usize
where
    F: Future<Output = ()>,
{
    let handle = ServerContext::mount(api, interval);
    let mut updates = handle.context().subscribe_status();
    let history = ViewerHistory::default();
    let mut frames = 0;

    tokio::pin!(stop);
    loop {
        tokio::select! {
            _ = &mut stop => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = updates.borrow_and_update().clone();
                let now = Utc::now();
                history.record(&status, now);
                on_frame(render_watch_frame(&status, &history.samples(), now));
                frames += 1;
            }
        }
    }

    handle.shutdown().await;
    frames
}

/// Handle `castctl watch`
pub async fn handle_watch(
    api: Arc<dyn AdminApi>,
    args: &WatchArgs,
    polling: &PollingConfig,
) -> anyhow::Result<()> {
    let interval = args
        .interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| polling.status_interval());
    if interval.is_zero() {
        anyhow::bail!("Interval must be at least one second");
    }

    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let frames = watch_until(api, interval, stop, |frame| {
        // Clear screen and home the cursor before each redraw.
        println!("\x1B[2J\x1B[H{}", frame);
    })
    .await;

    tracing::debug!(frames = frames, "Watch stopped");
    Ok(())
}
