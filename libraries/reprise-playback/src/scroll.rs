//! Scroll-offset persistence for paginated documents
//!
//! Uses the same key scheme and store as video positions, but the value is
//! a vertical scroll offset. Writes are debounced: each scroll event
//! cancels the pending write and schedules a new one, so only the most
//! recent offset is stored.
//!
//! Documents render progressively, so a restored offset is re-applied at
//! several configured delays. The pending retries are cancelled as a group.

use crate::progress::positive_number;
use reprise_core::{DocumentSettings, ResourceKey, SharedStore};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The scrollable viewport of a document page
pub trait ScrollTarget: Send + Sync {
    /// Scroll vertically to `offset`
    fn scroll_to(&self, offset: f64);
}

/// Debounced scroll-offset writer for one document context
pub struct ScrollTracker {
    key: ResourceKey,
    store: SharedStore,
    debounce: Duration,
    retry_delays: Vec<Duration>,
    pending: Option<JoinHandle<()>>,
}

impl ScrollTracker {
    pub fn new(key: ResourceKey, store: SharedStore, settings: &DocumentSettings) -> Self {
        Self {
            key,
            store,
            debounce: settings.scroll_debounce(),
            retry_delays: settings.restore_retry_delays(),
            pending: None,
        }
    }

    /// Record a scroll event
    ///
    /// Supersedes any write still waiting out its debounce period.
    /// Requires a Tokio runtime.
    pub fn on_scroll(&mut self, offset: f64) {
        self.cancel_pending();

        if !offset.is_finite() {
            return;
        }

        let key = self.key.clone();
        let store = Arc::clone(&self.store);
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Err(e) = store.set(key.as_str(), Value::from(offset)).await {
                warn!(key = %key, error = %e, "failed to save scroll offset");
            }
        }));
    }

    /// Whether a debounced write is still waiting
    pub fn has_pending_write(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Drop the pending write, if any
    pub fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Read the saved offset and schedule it to be applied at each retry delay
    ///
    /// Returns `None` when there is nothing to restore (absent, zero, or
    /// malformed). Requires a Tokio runtime.
    pub async fn restore(&self, target: Arc<dyn ScrollTarget>) -> Option<RestoreHandle> {
        let value = match self.store.get(self.key.as_str()).await {
            Ok(value) => value?,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read scroll offset");
                return None;
            }
        };
        let offset = positive_number(&value)?;

        debug!(key = %self.key, offset, retries = self.retry_delays.len(), "restoring scroll offset");

        let tasks = self
            .retry_delays
            .iter()
            .map(|delay| {
                let target = Arc::clone(&target);
                let delay = *delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    target.scroll_to(offset);
                })
            })
            .collect();

        Some(RestoreHandle { offset, tasks })
    }
}

impl Drop for ScrollTracker {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Scheduled scroll restores, cancelled together
///
/// Keep the handle alive until the document settles; dropping it cancels
/// the retries that have not run yet.
pub struct RestoreHandle {
    offset: f64,
    tasks: Vec<JoinHandle<()>>,
}

impl RestoreHandle {
    /// Offset being restored
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Cancel every retry that has not run yet
    pub fn cancel(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    /// Whether every retry has run (or been cancelled)
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(JoinHandle::is_finished)
    }
}

impl Drop for RestoreHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
