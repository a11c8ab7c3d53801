/// Storage keys and resource identity
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global preferred playback rate
pub const USER_PREFERRED_SPEED: &str = "user_preferred_speed";

/// Show the seek (rewind/forward) buttons
pub const PREF_REWIND: &str = "pref_rewind";

/// Show the speed control
pub const PREF_SPEED: &str = "pref_speed";

/// Show the incognito toggle
pub const PREF_INCOGNITO: &str = "pref_incognito";

/// Every key reserved for preferences; none of these is ever a resource
pub const PREFERENCE_KEYS: [&str; 4] = [PREF_REWIND, PREF_SPEED, PREF_INCOGNITO, USER_PREFERRED_SPEED];

/// Identity of a playback or document resource
///
/// The key is the exact address of the hosting page. It is deliberately not
/// normalized: `file:///a.mp4` and `file:///a.mp4#t=3` are unrelated
/// resources with independent records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Create a key from the page address
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the popup list should show this key as a resumable item
    pub fn is_resumable(&self, prefix: &str) -> bool {
        !PREFERENCE_KEYS.contains(&self.0.as_str()) && self.0.starts_with(prefix)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ResourceKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a page hosts a paginated document whose scroll offset is tracked
///
/// True when the content type mentions `pdf` or the address ends in `.pdf`.
pub fn is_document(content_type: Option<&str>, address: &str) -> bool {
    content_type.is_some_and(|ct| ct.contains("pdf")) || address.ends_with(".pdf")
}
