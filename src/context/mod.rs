//! Shared server context: live status and cached config.
//!
//! [`ServerContext::mount`] starts the polling task and returns a
//! [`PollingHandle`] that owns it. Views receive cheap [`ServerContext`]
//! clones and read snapshots or subscribe to changes. Dropping (or
//! [`PollingHandle::shutdown`]) stops polling; nothing is written to the
//! context after that point.
//!
//! Status is re-fetched every tick. Config is fetched once at mount and then
//! only changes through [`ServerContext::set_config_field`] once the server
//! has confirmed an update, or through an explicit
//! [`PollingHandle::refresh_config`].

mod error;
mod merge;


pub use error::ContextError;
pub use merge::set_field_at_path;

use crate::api::{AdminApi, ApiError, ServerConfig, ServerStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Cloneable view of the shared status and config caches.
#[derive(Clone)]
pub struct ServerContext {
    status: Arc<watch::Sender<ServerStatus>>,
    config: Arc<watch::Sender<ServerConfig>>,
}

impl Default for ServerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerContext {
    /// An unmounted context holding default (empty) snapshots.
    pub fn new() -> Self {
        Self {
            status: Arc::new(watch::Sender::new(ServerStatus::default())),
            config: Arc::new(watch::Sender::new(ServerConfig::default())),
        }
    }

    /// Start polling `api` every `interval` and return the owning handle.
    ///
    /// Status and config are fetched immediately; afterwards only status is
    /// re-fetched on each tick.
    pub fn mount(api: Arc<dyn AdminApi>, interval: Duration) -> PollingHandle {
        let context = Self::new();
        let cancel = CancellationToken::new();
        let poller = Poller {
            api,
            context: context.clone(),
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(poller.clone().run(interval));

        PollingHandle {
            poller,
            task: Some(task),
        }
    }

    /// Latest status snapshot.
    pub fn status(&self) -> ServerStatus {
        self.status.borrow().clone()
    }

    /// Latest config snapshot.
    pub fn config(&self) -> ServerConfig {
        self.config.borrow().clone()
    }

    /// Receiver that is notified whenever a poll replaces the status.
    pub fn subscribe_status(&self) -> watch::Receiver<ServerStatus> {
        self.status.subscribe()
    }

    /// Receiver that is notified whenever the cached config changes.
    pub fn subscribe_config(&self) -> watch::Receiver<ServerConfig> {
        self.config.subscribe()
    }

    /// Replace the status wholesale.
    pub fn replace_status(&self, status: ServerStatus) {
        self.status.send_replace(status);
    }

    /// Replace the config wholesale.
    pub fn replace_config(&self, config: ServerConfig) {
        self.config.send_replace(config);
    }

    /// Merge `value` into `field` of the object at dotted `path`
    /// (e.g. `"videoSettings"`, `"videoQualityVariants"`).
    ///
    /// Runs against the latest cached config, so quick successive edits of
    /// different fields never lose each other. Unknown paths, unknown fields
    /// and ill-typed values are rejected and leave the cache untouched.
    pub fn set_config_field(
        &self,
        path: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<(), ContextError> {
        let mut outcome = Ok(());

        self.config.send_if_modified(|config| {
            match merged_config(config, path, field, value) {
                Ok(next) => {
                    let changed = next != *config;
                    *config = next;
                    changed
                }
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            }
        });

        if outcome.is_ok() {
            tracing::debug!(path = path, field = field, "Config field updated");
        }
        outcome
    }
}

fn merged_config(
    current: &ServerConfig,
    path: &str,
    field: &str,
    value: serde_json::Value,
) -> Result<ServerConfig, ContextError> {
    let invalid = |message: String| ContextError::InvalidValue {
        field: field.to_string(),
        message,
    };

    let mut document = serde_json::to_value(current).map_err(|e| invalid(e.to_string()))?;
    set_field_at_path(&mut document, path, field, value)?;
    serde_json::from_value(document).map_err(|e| invalid(e.to_string()))
}

/// Background fetcher feeding a [`ServerContext`].
#[derive(Clone)]
struct Poller {
    api: Arc<dyn AdminApi>,
    context: ServerContext,
    cancel: CancellationToken,
}

impl Poller {
    /// Fetch status; a response that lands after cancellation is dropped.
    async fn refresh_status(&self) -> Result<(), ApiError> {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return Ok(()),
            result = self.api.status() => result,
        };
        let status = result?;
        if !self.cancel.is_cancelled() {
            self.context.replace_status(status);
        }
        Ok(())
    }

    async fn refresh_config(&self) -> Result<(), ApiError> {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return Ok(()),
            result = self.api.server_config() => result,
        };
        let config = result?;
        if !self.cancel.is_cancelled() {
            self.context.replace_config(config);
        }
        Ok(())
    }

    async fn run(self, interval: Duration) {
        tracing::info!(
            interval_seconds = interval.as_secs(),
            "Status polling started"
        );

        let (status, config) = tokio::join!(self.refresh_status(), self.refresh_config());
        if let Err(e) = status {
            tracing::warn!(error = %e, "Initial status fetch failed");
        }
        if let Err(e) = config {
            tracing::warn!(error = %e, "Initial config fetch failed");
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh_status().await {
                        tracing::warn!(error = %e, "Status poll failed, keeping previous snapshot");
                    }
                }
            }
        }

        tracing::info!("Status polling stopped");
    }
}

/// Owns the polling task. Dropping the handle stops polling.
pub struct PollingHandle {
    poller: Poller,
    task: Option<JoinHandle<()>>,
}

impl PollingHandle {
    /// The context fed by this handle's poller.
    pub fn context(&self) -> &ServerContext {
        &self.poller.context
    }

    /// Re-fetch the config now, outside the regular schedule.
    pub async fn refresh_config(&self) -> Result<(), ApiError> {
        self.poller.refresh_config().await
    }

    /// Re-fetch the status now, outside the regular schedule.
    pub async fn refresh_status(&self) -> Result<(), ApiError> {
        self.poller.refresh_status().await
    }

    pub fn is_active(&self) -> bool {
        !self.poller.cancel.is_cancelled()
    }

    /// Stop polling and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.poller.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Polling task ended abnormally");
            }
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.poller.cancel.cancel();
    }
}
