//! Per-site submission state with a self-clearing outcome message.

use super::MutationError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Where a mutation site is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl MutationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationPhase::Idle => "idle",
            MutationPhase::Submitting => "submitting",
            MutationPhase::Succeeded => "succeeded",
            MutationPhase::Failed => "failed",
        }
    }
}

/// What a site currently shows: its phase and an optional message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteStatus {
    pub phase: MutationPhase,
    pub message: Option<String>,
}

/// One submit control: a state machine plus a single reset timer.
///
/// `Idle -> Submitting -> Succeeded | Failed -> (reset) -> Idle`
///
/// Only the timer armed by the latest outcome may clear the status; every
/// transition bumps a generation counter that a stale timer checks before
/// writing. Dropping the site aborts the pending timer.
pub struct MutationSite {
    state: Arc<watch::Sender<SiteStatus>>,
    generation: Arc<AtomicU64>,
    reset_after: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl MutationSite {
    pub fn new(reset_after: Duration) -> Self {
        Self {
            state: Arc::new(watch::Sender::new(SiteStatus::default())),
            generation: Arc::new(AtomicU64::new(0)),
            reset_after,
            timer: Mutex::new(None),
        }
    }

    pub fn status(&self) -> SiteStatus {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SiteStatus> {
        self.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().phase == MutationPhase::Submitting
    }

    /// Enter `Submitting`, cancelling any pending reset.
    ///
    /// Refused with [`MutationError::Busy`] while a submission is running.
    pub fn begin(&self) -> Result<(), MutationError> {
        let mut busy = false;
        self.state.send_if_modified(|status| {
            if status.phase == MutationPhase::Submitting {
                busy = true;
                return false;
            }
            // Bumped under the channel lock so a reset timer that runs next
            // sees a stale generation.
            self.generation.fetch_add(1, Ordering::SeqCst);
            *status = SiteStatus {
                phase: MutationPhase::Submitting,
                message: None,
            };
            true
        });
        if busy {
            return Err(MutationError::Busy);
        }

        self.cancel_timer();
        Ok(())
    }

    /// Record a local validation failure: message shown, no timer armed.
    ///
    /// Returns `error` so call sites can `return Err(site.reject(..))`. A
    /// running submission is left alone.
    pub fn reject(&self, error: MutationError) -> MutationError {
        if self.is_busy() {
            return error;
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_timer();
        self.state.send_replace(SiteStatus {
            phase: MutationPhase::Idle,
            message: Some(error.to_string()),
        });
        error
    }

    pub fn succeed(&self, message: impl Into<String>) {
        self.finish(MutationPhase::Succeeded, message.into());
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.finish(MutationPhase::Failed, message.into());
    }

    /// Clear the status immediately and drop any pending timer.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_timer();
        self.state.send_replace(SiteStatus::default());
    }

    fn finish(&self, phase: MutationPhase, message: String) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(SiteStatus {
            phase,
            message: Some(message),
        });

        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let reset_after = self.reset_after;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(reset_after).await;
            clear_if_current(&state, &current, generation);
        });

        if let Ok(mut slot) = self.timer.lock() {
            if let Some(previous) = slot.replace(timer) {
                previous.abort();
            }
        }
    }

    pub(crate) fn cancel_timer(&self) {
        if let Ok(mut slot) = self.timer.lock() {
            if let Some(timer) = slot.take() {
                timer.abort();
            }
        }
    }
}

/// Reset `state` unless another transition happened since `generation`.
fn clear_if_current(state: &watch::Sender<SiteStatus>, current: &AtomicU64, generation: u64) {
    state.send_if_modified(|status| {
        if current.load(Ordering::SeqCst) != generation {
            return false;
        }
        *status = SiteStatus::default();
        true
    });
}

impl Drop for MutationSite {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

impl std::fmt::Debug for MutationSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationSite")
            .field("status", &*self.state.borrow())
            .field("reset_after", &self.reset_after)
            .finish()
    }
}
