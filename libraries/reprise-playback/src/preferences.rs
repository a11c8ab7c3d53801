//! Visibility and speed preferences
//!
//! Four top-level keys in the shared store: three visibility booleans and
//! the global preferred speed. Each context reads them on load and again
//! whenever the store reports that one of them changed, whichever context
//! made the change.
//!
//! An absent record means "default" (`true` for visibility, `1.0` for
//! speed), so a full-store clear resets every preference.

use crate::progress::positive_number;
use reprise_core::{
    PreferenceSnapshot, SharedStore, StorageChange, VisibilityFlags, VisibilityUpdate,
    PREFERENCE_KEYS, PREF_INCOGNITO, PREF_REWIND, PREF_SPEED, USER_PREFERRED_SPEED,
};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default playback rate when none is stored
pub const DEFAULT_SPEED: f64 = 1.0;

/// Reads and writes preferences in the shared store
#[derive(Clone)]
pub struct PreferenceStore {
    store: SharedStore,
}

impl PreferenceStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Current visibility flags; unreadable storage yields the defaults
    pub async fn get_visibility(&self) -> VisibilityFlags {
        match self
            .store
            .get_many(&[PREF_REWIND, PREF_SPEED, PREF_INCOGNITO])
            .await
        {
            Ok(values) => visibility_from(&values),
            Err(e) => {
                warn!(error = %e, "failed to read visibility preferences");
                VisibilityFlags::default()
            }
        }
    }

    /// Persist the provided flags; flags left as `None` are not touched
    pub async fn set_visibility(&self, update: VisibilityUpdate) -> reprise_core::Result<()> {
        let entries: Vec<(String, Value)> = [
            (PREF_REWIND, update.show_rewind),
            (PREF_SPEED, update.show_speed),
            (PREF_INCOGNITO, update.show_incognito),
        ]
        .into_iter()
        .filter_map(|(key, flag)| flag.map(|f| (key.to_string(), Value::Bool(f))))
        .collect();

        if entries.is_empty() {
            return Ok(());
        }

        debug!(?update, "saving visibility preferences");
        self.store.set_many(entries).await
    }

    /// Preferred playback rate; absent or malformed yields `1.0`
    pub async fn get_speed(&self) -> f64 {
        match self.store.get(USER_PREFERRED_SPEED).await {
            Ok(value) => speed_from(value.as_ref()),
            Err(e) => {
                warn!(error = %e, "failed to read preferred speed");
                DEFAULT_SPEED
            }
        }
    }

    /// Persist the preferred playback rate
    ///
    /// The caller clamps to the configured speed range; only non-finite
    /// values are rejected here.
    pub async fn set_speed(&self, value: f64) -> reprise_core::Result<()> {
        if !value.is_finite() {
            return Err(reprise_core::RepriseError::invalid_input(format!(
                "speed must be finite, got {value}"
            )));
        }
        self.store.set(USER_PREFERRED_SPEED, Value::from(value)).await
    }

    /// Visibility and speed in a single read
    pub async fn snapshot(&self) -> PreferenceSnapshot {
        match self.store.get_many(&PREFERENCE_KEYS).await {
            Ok(values) => PreferenceSnapshot {
                visibility: visibility_from(&values),
                speed: speed_from(values.get(USER_PREFERRED_SPEED)),
            },
            Err(e) => {
                warn!(error = %e, "failed to read preferences");
                PreferenceSnapshot::default()
            }
        }
    }

    /// Subscribe to preference changes made by any context
    ///
    /// The subscription only starts observing once created; changes made
    /// before this call are not replayed.
    pub fn subscribe(&self) -> PreferenceSubscription {
        PreferenceSubscription {
            prefs: self.clone(),
            changes: self.store.subscribe(),
        }
    }

    /// Run `callback` with a fresh snapshot after every preference change
    ///
    /// Requires a Tokio runtime. The listener stops when the returned
    /// handle is dropped or cancelled.
    pub fn on_change<F>(&self, mut callback: F) -> ListenerHandle
    where
        F: FnMut(PreferenceSnapshot) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        let task = tokio::spawn(async move {
            while let Some(snapshot) = subscription.next().await {
                callback(snapshot);
            }
        });
        ListenerHandle { task }
    }
}

/// Stream of preference snapshots, one per relevant store change
pub struct PreferenceSubscription {
    prefs: PreferenceStore,
    changes: broadcast::Receiver<StorageChange>,
}

impl PreferenceSubscription {
    /// Wait for the next preference change and return the current values
    ///
    /// Changes to unrelated keys (resume positions) are skipped. Returns
    /// `None` once the store is gone.
    pub async fn next(&mut self) -> Option<PreferenceSnapshot> {
        loop {
            match self.changes.recv().await {
                Ok(change) if change.touches_any(&PREFERENCE_KEYS) => {
                    return Some(self.prefs.snapshot().await);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    // Missed notifications may have carried preference changes
                    debug!(skipped, "preference subscriber lagged, re-reading");
                    return Some(self.prefs.snapshot().await);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Background preference listener, stopped on drop
pub struct ListenerHandle {
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Stop listening
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Whether the listener has stopped
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Only an explicit `false` hides a control
fn visibility_from(values: &HashMap<String, Value>) -> VisibilityFlags {
    let shown = |key: &str| values.get(key) != Some(&Value::Bool(false));
    VisibilityFlags {
        show_rewind: shown(PREF_REWIND),
        show_speed: shown(PREF_SPEED),
        show_incognito: shown(PREF_INCOGNITO),
    }
}

fn speed_from(value: Option<&Value>) -> f64 {
    value.and_then(positive_number).unwrap_or(DEFAULT_SPEED)
}
