/// Visibility and speed preferences
use serde::{Deserialize, Serialize};

/// Which optional controls the content UI shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityFlags {
    /// Seek buttons
    pub show_rewind: bool,
    /// Speed control
    pub show_speed: bool,
    /// Incognito toggle
    pub show_incognito: bool,
}

impl VisibilityFlags {
    /// Every control visible
    pub const fn all_visible() -> Self {
        Self {
            show_rewind: true,
            show_speed: true,
            show_incognito: true,
        }
    }

    /// Apply a partial update, leaving unspecified flags untouched
    #[must_use]
    pub fn apply(mut self, update: &VisibilityUpdate) -> Self {
        if let Some(show_rewind) = update.show_rewind {
            self.show_rewind = show_rewind;
        }
        if let Some(show_speed) = update.show_speed {
            self.show_speed = show_speed;
        }
        if let Some(show_incognito) = update.show_incognito {
            self.show_incognito = show_incognito;
        }
        self
    }
}

impl Default for VisibilityFlags {
    fn default() -> Self {
        Self::all_visible()
    }
}

/// Partial visibility update; only provided flags are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisibilityUpdate {
    /// Set seek button visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_rewind: Option<bool>,

    /// Set speed control visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_speed: Option<bool>,

    /// Set incognito toggle visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_incognito: Option<bool>,
}

impl VisibilityUpdate {
    /// Whether the update carries no flag at all
    pub fn is_empty(&self) -> bool {
        self.show_rewind.is_none() && self.show_speed.is_none() && self.show_incognito.is_none()
    }
}

impl From<VisibilityFlags> for VisibilityUpdate {
    fn from(flags: VisibilityFlags) -> Self {
        Self {
            show_rewind: Some(flags.show_rewind),
            show_speed: Some(flags.show_speed),
            show_incognito: Some(flags.show_incognito),
        }
    }
}

/// Current preference values as seen by one context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceSnapshot {
    /// Control visibility
    pub visibility: VisibilityFlags,
    /// Preferred playback rate
    pub speed: f64,
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Self {
            visibility: VisibilityFlags::all_visible(),
            speed: 1.0,
        }
    }
}
