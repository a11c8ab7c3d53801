//! Reprise configuration
//!
//! Every setting has a default matching the shipped extension, so an empty
//! file (or no file at all) yields a working configuration.
//!
//! Values are layered: defaults, then an optional TOML file, then
//! environment variables prefixed with `REPRISE_` using `__` between
//! section and field (e.g. `REPRISE_VIDEO__SAVE_INTERVAL_MS=5000`).

use crate::error::{RepriseError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RepriseConfig {
    /// Video playback settings
    #[serde(default)]
    pub video: VideoSettings,

    /// Document scroll settings
    #[serde(default)]
    pub document: DocumentSettings,

    /// Resumable-item listing settings
    #[serde(default)]
    pub library: LibrarySettings,
}

/// Playback controls and position persistence
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Seconds moved by the `J`/`L` shortcuts
    pub key_step: f64,
    /// Seconds moved by the on-screen seek buttons
    pub button_step: f64,
    /// Seconds moved by the arrow keys
    pub arrow_step: f64,
    /// Period of the autosave timer while playing
    pub save_interval_ms: u64,
    /// Percentage of the duration at which the record is purged
    pub completion_threshold: f64,
    /// Slowest selectable playback rate
    pub min_speed: f64,
    /// Fastest selectable playback rate
    pub max_speed: f64,
    /// Granularity of the speed slider
    pub speed_step: f64,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            key_step: 5.0,
            button_step: 10.0,
            arrow_step: 5.0,
            save_interval_ms: 2000,
            completion_threshold: 90.0,
            min_speed: 0.5,
            max_speed: 3.0,
            speed_step: 0.25,
        }
    }
}

impl VideoSettings {
    /// Autosave period as a `Duration`
    pub fn save_interval(&self) -> Duration {
        Duration::from_millis(self.save_interval_ms)
    }

    /// Check the ranges the session timer and speed clamp rely on
    pub fn validate(&self) -> Result<()> {
        if !(self.completion_threshold > 0.0 && self.completion_threshold <= 100.0) {
            return Err(RepriseError::config(format!(
                "video.completion_threshold must be in (0, 100], got {}",
                self.completion_threshold
            )));
        }

        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed) {
            return Err(RepriseError::config(format!(
                "speed range [{}, {}] must be positive and ordered",
                self.min_speed, self.max_speed
            )));
        }

        if !(self.speed_step > 0.0 && self.speed_step.is_finite()) {
            return Err(RepriseError::config("video.speed_step must be positive"));
        }

        if self.save_interval_ms == 0 {
            return Err(RepriseError::config("video.save_interval_ms must be non-zero"));
        }

        Ok(())
    }
}

/// Scroll-offset persistence for paginated documents
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Quiet period after the last scroll event before the offset is written
    pub scroll_debounce_ms: u64,
    /// Delays at which a restored offset is re-applied while the document renders
    pub restore_retry_delays_ms: Vec<u64>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            scroll_debounce_ms: 500,
            restore_retry_delays_ms: vec![0, 500, 1500],
        }
    }
}

impl DocumentSettings {
    /// Debounce period as a `Duration`
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    /// Retry delays as `Duration`s
    pub fn restore_retry_delays(&self) -> Vec<Duration> {
        self.restore_retry_delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }
}

/// Popup listing of resumable items
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Keys starting with this prefix are listed as resumable items
    pub resumable_prefix: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            resumable_prefix: "file://".to_string(),
        }
    }
}

impl RepriseConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(RepriseError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("REPRISE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("document.restore_retry_delays_ms"),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;

        if self.library.resumable_prefix.is_empty() {
            return Err(RepriseError::config("library.resumable_prefix must not be empty"));
        }

        Ok(())
    }
}
