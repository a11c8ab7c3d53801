//! Playback position persistence
//!
//! One record per resource key holding the elapsed seconds. A record is
//! written while playback is in progress and removed once the completion
//! threshold is reached, so finished resources start from the beginning
//! next time instead of resuming a few seconds before the end.
//!
//! `save` is idempotent: the UI shell calls it from a timer, on pause, on
//! unload, and after every manual seek, and redundant calls are harmless.

use reprise_core::{ResourceKey, SharedStore, VideoSettings};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Default completion threshold, in percent of the duration
pub const DEFAULT_COMPLETION_THRESHOLD: f64 = 90.0;

/// Why a save did not touch storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The context is in incognito mode
    Incognito,
    /// Media metadata is not loaded yet (duration zero, NaN or infinite)
    DurationUnknown,
    /// Position is zero, negative or NaN
    NotStarted,
}

/// What a call to [`ProgressTracker::save`] did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SaveOutcome {
    /// Position written
    Saved(f64),
    /// Completion threshold reached, record removed if there was one
    Cleared,
    /// Nothing to do
    Skipped(SkipReason),
    /// Storage failed; the position is lost for this invocation
    Dropped,
}

impl SaveOutcome {
    /// Whether a write or removal was issued
    pub fn wrote(&self) -> bool {
        matches!(self, Self::Saved(_) | Self::Cleared)
    }
}

/// Reads, writes, and clears resume positions
#[derive(Clone)]
pub struct ProgressTracker {
    store: SharedStore,
    completion_threshold: f64,
}

impl ProgressTracker {
    /// Create a tracker with the default 90% completion threshold
    pub fn new(store: SharedStore) -> Self {
        Self::with_threshold(store, DEFAULT_COMPLETION_THRESHOLD)
    }

    /// Create a tracker with a custom completion threshold (percent)
    pub fn with_threshold(store: SharedStore, completion_threshold: f64) -> Self {
        Self {
            store,
            completion_threshold,
        }
    }

    /// Create a tracker from video settings
    pub fn from_settings(store: SharedStore, settings: &VideoSettings) -> Self {
        Self::with_threshold(store, settings.completion_threshold)
    }

    /// Completion threshold in percent
    pub fn completion_threshold(&self) -> f64 {
        self.completion_threshold
    }

    /// Read the saved position for `key`
    ///
    /// Call once at load time, before playback starts; the caller seeks to
    /// the returned position. Missing, malformed, and unreadable records all
    /// yield `None`.
    pub async fn restore(&self, key: &ResourceKey) -> Option<f64> {
        let value = match self.store.get(key.as_str()).await {
            Ok(value) => value?,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read saved position");
                return None;
            }
        };

        let position = positive_number(&value);
        if position.is_none() {
            warn!(key = %key, value = %value, "ignoring malformed saved position");
        }
        position
    }

    /// Persist the position of `key`, or clear it when playback is complete
    ///
    /// Never fails: storage errors are logged and reported as
    /// [`SaveOutcome::Dropped`]; the next trigger tries again.
    pub async fn save(
        &self,
        key: &ResourceKey,
        current_position: f64,
        total_duration: f64,
        incognito: bool,
    ) -> SaveOutcome {
        if incognito {
            return SaveOutcome::Skipped(SkipReason::Incognito);
        }

        if !total_duration.is_finite() || total_duration <= 0.0 {
            return SaveOutcome::Skipped(SkipReason::DurationUnknown);
        }

        let completion = current_position / total_duration * 100.0;

        if completion >= self.completion_threshold {
            debug!(key = %key, completion, "playback complete, clearing position");
            return match self.store.remove(key.as_str()).await {
                Ok(()) => SaveOutcome::Cleared,
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to clear finished position");
                    SaveOutcome::Dropped
                }
            };
        }

        if current_position > 0.0 {
            return match self
                .store
                .set(key.as_str(), Value::from(current_position))
                .await
            {
                Ok(()) => SaveOutcome::Saved(current_position),
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to save position");
                    SaveOutcome::Dropped
                }
            };
        }

        SaveOutcome::Skipped(SkipReason::NotStarted)
    }

    /// Remove the record for `key` regardless of progress
    pub async fn forget(&self, key: &ResourceKey) -> reprise_core::Result<()> {
        self.store.remove(key.as_str()).await
    }
}

/// Interpret a stored value as a strictly positive, finite number
///
/// Numbers and numeric strings are accepted; anything else is absent.
pub(crate) fn positive_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    (number.is_finite() && number > 0.0).then_some(number)
}
