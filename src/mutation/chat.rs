//! Chat moderation: a page-local message list with single and bulk
//! visibility changes.

use super::{MutationError, MutationPhase, MutationSite, SiteStatus};
use crate::api::{AdminApi, ApiError, ChatMessage, VisibilityRequest};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Bulk visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Show,
    Hide,
}

impl BulkAction {
    pub fn visible(&self) -> bool {
        matches!(self, BulkAction::Show)
    }

    fn past_tense(&self) -> &'static str {
        match self {
            BulkAction::Show => "shown",
            BulkAction::Hide => "hidden",
        }
    }
}

/// Set `visible` on every message whose id is in `ids`.
///
/// Returns how many messages matched. Ids not present are ignored.
pub fn apply_visibility(messages: &mut [ChatMessage], ids: &[String], visible: bool) -> usize {
    let mut matched = 0;
    for message in messages.iter_mut() {
        if ids.iter().any(|id| *id == message.id) {
            message.visible = visible;
            matched += 1;
        }
    }
    matched
}

/// Owns the chat list for as long as the moderation view is open.
///
/// Each message gets its own toggle site on first use; bulk changes share one
/// site. [`ChatModeration::unmount`] (or drop) stops the reload poll and all
/// timers, and any response arriving afterwards is discarded.
pub struct ChatModeration {
    api: Arc<dyn AdminApi>,
    messages: Arc<watch::Sender<Vec<ChatMessage>>>,
    selection: Mutex<Vec<String>>,
    toggle_sites: DashMap<String, Arc<MutationSite>>,
    bulk_site: MutationSite,
    bulk_action: Mutex<Option<BulkAction>>,
    reset_after: Duration,
    cancel: CancellationToken,
    reload: Mutex<Option<JoinHandle<()>>>,
}

impl ChatModeration {
    pub fn new(api: Arc<dyn AdminApi>, reset_after: Duration) -> Self {
        Self {
            api,
            messages: Arc::new(watch::Sender::new(Vec::new())),
            selection: Mutex::new(Vec::new()),
            toggle_sites: DashMap::new(),
            bulk_site: MutationSite::new(reset_after),
            bulk_action: Mutex::new(None),
            reset_after,
            cancel: CancellationToken::new(),
            reload: Mutex::new(None),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.subscribe()
    }

    /// Replace the local list with the server's chat history.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        fetch_into(self.api.as_ref(), &self.messages, &self.cancel).await
    }

    /// Fetch now and then every `interval` until unmounted.
    pub fn spawn_reload(&self, interval: Duration) {
        let api = Arc::clone(&self.api);
        let messages = Arc::clone(&self.messages);
        let cancel = self.cancel.clone();

        let task = tokio::spawn(async move {
            if let Err(e) = fetch_into(api.as_ref(), &messages, &cancel).await {
                tracing::warn!(error = %e, "Chat history fetch failed");
            }

            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = fetch_into(api.as_ref(), &messages, &cancel).await {
                            tracing::warn!(error = %e, "Chat reload failed, keeping previous list");
                        }
                    }
                }
            }
            tracing::debug!("Chat reload stopped");
        });

        if let Ok(mut slot) = self.reload.lock() {
            if let Some(previous) = slot.replace(task) {
                previous.abort();
            }
        }
    }

    /// Stop reloading and drop every pending timer. Nothing is written to
    /// the list after this returns.
    pub fn unmount(&self) {
        self.cancel.cancel();
        if let Ok(mut slot) = self.reload.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
        self.toggle_sites.clear();
        self.bulk_site.cancel_timer();
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selection(&self) -> Vec<String> {
        self.selection.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Add a message to the bulk selection. Only ids in the current list can
    /// be selected.
    pub fn select(&self, id: &str) -> Result<(), MutationError> {
        if !self.messages.borrow().iter().any(|m| m.id == id) {
            return Err(MutationError::UnknownMessage(id.to_string()));
        }
        if let Ok(mut selection) = self.selection.lock() {
            if !selection.iter().any(|s| s == id) {
                selection.push(id.to_string());
            }
        }
        Ok(())
    }

    pub fn deselect(&self, id: &str) {
        if let Ok(mut selection) = self.selection.lock() {
            selection.retain(|s| s != id);
        }
    }

    pub fn clear_selection(&self) {
        if let Ok(mut selection) = self.selection.lock() {
            selection.clear();
        }
    }

    // ------------------------------------------------------------------
    // Single toggle
    // ------------------------------------------------------------------

    /// Outcome shown next to one message, if it has been toggled.
    pub fn toggle_status(&self, id: &str) -> Option<SiteStatus> {
        self.toggle_sites.get(id).map(|site| site.status())
    }

    /// Flip one message's visibility. Returns the new visibility.
    pub async fn toggle_visibility(&self, id: &str) -> Result<bool, MutationError> {
        let current = self
            .messages
            .borrow()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.visible)
            .ok_or_else(|| MutationError::UnknownMessage(id.to_string()))?;

        let site = self
            .toggle_sites
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(MutationSite::new(self.reset_after)))
            .clone();

        let visible = !current;
        let ids = vec![id.to_string()];
        self.submit_visibility(&site, ids, visible).await?;

        let message = if visible {
            "Message shown."
        } else {
            "Message hidden."
        };
        site.succeed(message);
        Ok(visible)
    }

    // ------------------------------------------------------------------
    // Bulk
    // ------------------------------------------------------------------

    pub fn bulk_status(&self) -> SiteStatus {
        self.bulk_site.status()
    }

    /// The bulk action whose outcome is currently shown, if any.
    ///
    /// A rejected submission leaves the site `Idle` with a message, which
    /// carries no action.
    pub fn bulk_action(&self) -> Option<BulkAction> {
        if self.bulk_site.status().phase == MutationPhase::Idle {
            return None;
        }
        self.bulk_action.lock().ok().and_then(|a| *a)
    }

    /// Apply `action` to every selected message in one request.
    ///
    /// On success all selected messages change and the selection is cleared.
    /// Returns the number of messages changed.
    pub async fn submit_bulk(&self, action: BulkAction) -> Result<usize, MutationError> {
        let ids = self.selection();
        if ids.is_empty() {
            let error = self.bulk_site.reject(MutationError::NothingSelected);
            if !self.bulk_site.is_busy() {
                if let Ok(mut slot) = self.bulk_action.lock() {
                    *slot = None;
                }
            }
            return Err(error);
        }
        if matches!(self.bulk_action(), Some(shown) if shown != action) {
            return Err(MutationError::Busy);
        }

        if let Ok(mut slot) = self.bulk_action.lock() {
            *slot = Some(action);
        }

        let count = ids.len();
        self.submit_visibility(&self.bulk_site, ids, action.visible())
            .await?;

        self.clear_selection();
        let noun = if count == 1 { "message" } else { "messages" };
        self.bulk_site
            .succeed(format!("{} {} {}.", count, noun, action.past_tense()));
        Ok(count)
    }

    /// Shared request path: begin, POST, and on confirmation merge into the
    /// latest list. Records failures on `site`; the caller records success.
    async fn submit_visibility(
        &self,
        site: &MutationSite,
        ids: Vec<String>,
        visible: bool,
    ) -> Result<(), MutationError> {
        site.begin()?;

        let request = VisibilityRequest {
            visible,
            id_array: ids,
        };

        let result = tokio::select! {
            _ = self.cancel.cancelled() => return Err(MutationError::Detached),
            result = self.api.set_message_visibility(&request) => result,
        };
        if self.cancel.is_cancelled() {
            return Err(MutationError::Detached);
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Chat visibility update failed");
                site.fail(e.to_string());
                return Err(e.into());
            }
        };

        if !response.is_changed() {
            let message = if response.message.is_empty() || response.success {
                "Visibility change was not confirmed".to_string()
            } else {
                response.message
            };
            tracing::warn!(message = %message, "Chat visibility update rejected");
            site.fail(message.clone());
            return Err(MutationError::Rejected(message));
        }

        self.messages.send_modify(|messages| {
            apply_visibility(messages, &request.id_array, visible);
        });
        tracing::info!(
            count = request.id_array.len(),
            visible = visible,
            "Chat visibility updated"
        );
        Ok(())
    }
}

impl Drop for ChatModeration {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Fetch chat history into `messages` unless `cancel` fires first.
async fn fetch_into(
    api: &dyn AdminApi,
    messages: &watch::Sender<Vec<ChatMessage>>,
    cancel: &CancellationToken,
) -> Result<(), ApiError> {
    let result = tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        result = api.chat_history() => result,
    };
    let history = result?;
    if !cancel.is_cancelled() {
        messages.send_replace(history);
    }
    Ok(())
}
