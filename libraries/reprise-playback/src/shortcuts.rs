//! Keyboard shortcuts for the video controls
//!
//! | Key | Action |
//! |---|---|
//! | `J` / `L` | seek back / forward by `key_step` |
//! | `ArrowLeft` / `ArrowRight` | seek back / forward by `arrow_step` |
//! | `Space` / `K` | toggle play/pause |
//! | `F` | toggle fullscreen (left to the UI shell) |
//! | `I` | toggle incognito |

use reprise_core::VideoSettings;
use serde::{Deserialize, Serialize};

/// A key press as reported by the host page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyInput {
    /// Physical key code (`KeyJ`, `ArrowLeft`, `Space`, ...)
    pub code: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    /// Focus is in a text input or textarea
    pub editing_text: bool,
}

impl KeyInput {
    /// Unmodified key press outside any text field
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn in_text_field(mut self) -> Self {
        self.editing_text = true;
        self
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// What a shortcut asks for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShortcutAction {
    /// Move the playhead by this many seconds (negative = back)
    Seek(f64),
    TogglePlay,
    ToggleFullscreen,
    ToggleIncognito,
}

impl ShortcutAction {
    /// Map a key press to an action
    ///
    /// Returns `None` for unbound keys, while a text field has focus, or
    /// when ctrl/alt/meta is held (browser shortcuts take precedence).
    pub fn from_key(input: &KeyInput, settings: &VideoSettings) -> Option<Self> {
        if input.editing_text || input.has_modifier() {
            return None;
        }

        match input.code.as_str() {
            "KeyJ" => Some(Self::Seek(-settings.key_step)),
            "KeyL" => Some(Self::Seek(settings.key_step)),
            "ArrowLeft" => Some(Self::Seek(-settings.arrow_step)),
            "ArrowRight" => Some(Self::Seek(settings.arrow_step)),
            "Space" | "KeyK" => Some(Self::TogglePlay),
            "KeyF" => Some(Self::ToggleFullscreen),
            "KeyI" => Some(Self::ToggleIncognito),
            _ => None,
        }
    }
}
