//! Per-context playback controller
//!
//! One `PlaybackSession` exists per page hosting a video. It owns the
//! in-memory incognito flag and the autosave timer, and wires every save
//! trigger (timer tick, pause, unload, manual seek) to the same
//! [`ProgressTracker::save`] call. Dropping the session stops its timer.

use crate::error::{PlaybackError, Result};
use crate::media::MediaElement;
use crate::preferences::PreferenceStore;
use crate::progress::{ProgressTracker, SaveOutcome};
use crate::shortcuts::{KeyInput, ShortcutAction};
use reprise_core::{PreferenceSnapshot, ResourceKey, SharedStore, VideoSettings};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// What the UI shell needs to render after [`PlaybackSession::load`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSnapshot {
    /// Position the media was moved to, if one was saved
    pub restored_position: Option<f64>,
    /// Preferences applied to this context
    pub preferences: PreferenceSnapshot,
}

/// Clamp a requested speed to the configured range, snapped to the slider step
///
/// `settings` must pass [`VideoSettings::validate`].
pub fn clamp_speed(value: f64, settings: &VideoSettings) -> f64 {
    let steps = ((value - settings.min_speed) / settings.speed_step).round();
    let snapped = settings.min_speed + steps * settings.speed_step;
    snapped.clamp(settings.min_speed, settings.max_speed)
}

/// Controller for one playback context
pub struct PlaybackSession {
    key: ResourceKey,
    media: Arc<dyn MediaElement>,
    tracker: ProgressTracker,
    preferences: PreferenceStore,
    settings: VideoSettings,
    incognito: Arc<AtomicBool>,
    autosave: Option<JoinHandle<()>>,
}

impl PlaybackSession {
    /// Create a session for the page at `key`
    ///
    /// Fails when `settings` would stall the autosave timer or invert the
    /// speed range.
    pub fn new(
        key: ResourceKey,
        media: Arc<dyn MediaElement>,
        store: SharedStore,
        settings: VideoSettings,
    ) -> Result<Self> {
        settings
            .validate()
            .map_err(|e| PlaybackError::InvalidSettings(e.to_string()))?;

        Ok(Self {
            key,
            media,
            tracker: ProgressTracker::from_settings(store.clone(), &settings),
            preferences: PreferenceStore::new(store),
            settings,
            incognito: Arc::new(AtomicBool::new(false)),
            autosave: None,
        })
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Restore position and speed, read visibility
    ///
    /// Call once when the page loads, before playback starts. Resets the
    /// incognito flag.
    pub async fn load(&self) -> SessionSnapshot {
        self.incognito.store(false, Ordering::SeqCst);

        let restored_position = self.tracker.restore(&self.key).await;
        if let Some(position) = restored_position {
            info!(key = %self.key, position, "resuming playback");
            self.media.set_current_time(position);
        }

        let preferences = self.preferences.snapshot().await;
        self.media.set_playback_rate(preferences.speed);

        SessionSnapshot {
            restored_position,
            preferences,
        }
    }

    /// Save the current position now
    pub async fn save_now(&self) -> SaveOutcome {
        self.tracker
            .save(
                &self.key,
                self.media.current_time(),
                self.media.duration(),
                self.is_incognito(),
            )
            .await
    }

    /// Media paused
    pub async fn on_pause(&self) -> SaveOutcome {
        self.save_now().await
    }

    /// Page is being unloaded
    pub async fn on_unload(&self) -> SaveOutcome {
        self.save_now().await
    }

    /// Move the playhead by `delta` seconds and save
    pub async fn seek_by(&self, delta: f64) -> SaveOutcome {
        let mut target = (self.media.current_time() + delta).max(0.0);
        let duration = self.media.duration();
        if duration.is_finite() && duration > 0.0 {
            target = target.min(duration);
        }

        self.media.set_current_time(target);
        self.save_now().await
    }

    /// Seek-back button
    pub async fn rewind(&self) -> SaveOutcome {
        self.seek_by(-self.settings.button_step).await
    }

    /// Seek-forward button
    pub async fn forward(&self) -> SaveOutcome {
        self.seek_by(self.settings.button_step).await
    }

    /// Apply and persist a playback rate
    ///
    /// Returns the rate actually applied after clamping to the configured
    /// range.
    pub async fn set_speed(&self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(PlaybackError::InvalidSpeed(value));
        }

        let speed = clamp_speed(value, &self.settings);
        self.media.set_playback_rate(speed);
        self.preferences.set_speed(speed).await?;
        debug!(requested = value, applied = speed, "playback speed changed");
        Ok(speed)
    }

    /// Flip the incognito flag, returning the new state
    pub fn toggle_incognito(&self) -> bool {
        let now = !self.incognito.fetch_xor(true, Ordering::SeqCst);
        info!(key = %self.key, incognito = now, "incognito toggled");
        now
    }

    pub fn is_incognito(&self) -> bool {
        self.incognito.load(Ordering::SeqCst)
    }

    /// Handle a key press
    ///
    /// Seeks (followed by a save), play/pause, and incognito are handled
    /// here. `ToggleFullscreen` is returned for the UI shell to perform.
    pub async fn handle_key(&self, input: &KeyInput) -> Option<ShortcutAction> {
        let action = ShortcutAction::from_key(input, &self.settings)?;

        match action {
            ShortcutAction::Seek(delta) => {
                self.seek_by(delta).await;
            }
            ShortcutAction::TogglePlay => {
                if self.media.is_paused() {
                    self.media.play();
                } else {
                    self.media.pause();
                }
            }
            ShortcutAction::ToggleIncognito => {
                self.toggle_incognito();
            }
            ShortcutAction::ToggleFullscreen => {}
        }

        Some(action)
    }

    /// Start the periodic autosave timer
    ///
    /// Saves every `save_interval` while the media is playing. Restarting
    /// replaces the previous timer. Requires a Tokio runtime.
    pub fn start_autosave(&mut self) {
        self.stop_autosave();

        let key = self.key.clone();
        let media = Arc::clone(&self.media);
        let tracker = self.tracker.clone();
        let incognito = Arc::clone(&self.incognito);
        let period = self.settings.save_interval();

        self.autosave = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately; the first save is one period in
            interval.tick().await;

            loop {
                interval.tick().await;
                if media.is_paused() {
                    continue;
                }
                tracker
                    .save(
                        &key,
                        media.current_time(),
                        media.duration(),
                        incognito.load(Ordering::SeqCst),
                    )
                    .await;
            }
        }));
    }

    /// Stop the periodic autosave timer
    pub fn stop_autosave(&mut self) {
        if let Some(task) = self.autosave.take() {
            task.abort();
        }
    }

    pub fn is_autosaving(&self) -> bool {
        self.autosave.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Final save and timer shutdown when the context goes away
    pub async fn teardown(mut self) -> SaveOutcome {
        self.stop_autosave();
        self.on_unload().await
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.stop_autosave();
    }
}
