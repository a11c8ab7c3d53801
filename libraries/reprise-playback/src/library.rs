//! Resumable-item library
//!
//! Backs the popup list: every stored resource whose key starts with the
//! resumable prefix, shown with a readable title and an `HH:MM:SS`
//! timestamp. Preference keys are never listed.

use crate::preferences::PreferenceStore;
use crate::progress::positive_number;
use percent_encoding::percent_decode_str;
use reprise_core::{KeyValueStore, ResourceKey, SharedStore, VisibilityFlags};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Container extensions stripped from displayed titles
const MEDIA_EXTENSIONS: [&str; 4] = [".mp4", ".mkv", ".avi", ".webm"];

/// One resumable entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumableItem {
    pub key: ResourceKey,
    pub title: String,
    /// Saved position in seconds (scroll offset for documents)
    pub position: f64,
}

impl ResumableItem {
    /// Position formatted as `HH:MM:SS`
    pub fn timestamp(&self) -> String {
        format_timestamp(self.position)
    }
}

/// Preferences the settings form still holds when the store is cleared
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RetainedPreferences {
    pub visibility: VisibilityFlags,
    /// Re-persisted only when set
    pub speed: Option<f64>,
}

/// List every resumable item, sorted by key
///
/// Values are read the way a restore reads them: numbers and numeric
/// strings are listed, anything that would not resume is skipped.
pub async fn list_resumable(
    store: &dyn KeyValueStore,
    prefix: &str,
) -> reprise_core::Result<Vec<ResumableItem>> {
    let mut items: Vec<ResumableItem> = store
        .get_all()
        .await?
        .into_iter()
        .filter_map(|(key, value)| {
            let key = ResourceKey::new(key);
            if !key.is_resumable(prefix) {
                return None;
            }
            let position = positive_number(&value)?;
            Some(ResumableItem {
                title: display_title(key.as_str()),
                key,
                position,
            })
        })
        .collect();

    items.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(items)
}

/// Forget one item
pub async fn remove_item(store: &dyn KeyValueStore, key: &ResourceKey) -> reprise_core::Result<()> {
    store.remove(key.as_str()).await
}

/// Wipe the whole store, then re-persist the retained preferences
///
/// Clearing also erases preferences, so the values still shown in the
/// settings form are written back immediately.
pub async fn clear_all(
    store: &SharedStore,
    retained: &RetainedPreferences,
) -> reprise_core::Result<()> {
    store.clear().await?;

    let prefs = PreferenceStore::new(Arc::clone(store));
    prefs.set_visibility(retained.visibility.into()).await?;
    if let Some(speed) = retained.speed {
        prefs.set_speed(speed).await?;
    }

    info!("cleared all resume data");
    Ok(())
}

/// Human-readable title for a resource address
///
/// Last path segment, percent-decoded, with the first media extension
/// removed.
pub fn display_title(address: &str) -> String {
    let segment = address.rsplit('/').next().unwrap_or(address);
    let decoded = percent_decode_str(segment).decode_utf8_lossy();

    // ASCII lowercasing keeps byte offsets aligned with `decoded`
    let lower = decoded.to_ascii_lowercase();
    let found = MEDIA_EXTENSIONS
        .iter()
        .filter_map(|ext| lower.find(ext).map(|at| (at, ext.len())))
        .min_by_key(|(at, _)| *at);

    match found {
        Some((at, len)) => {
            let mut title = decoded.into_owned();
            title.replace_range(at..at + len, "");
            title
        }
        None => decoded.into_owned(),
    }
}

/// Format seconds as `HH:MM:SS`, wrapping at 24 hours
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        (seconds.floor() as u64) % 86_400
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_decodes_and_strips_extension() {
        assert_eq!(
            display_title("file:///home/me/My%20Movie.mp4"),
            "My Movie"
        );
        assert_eq!(display_title("file:///clips/Trip.MKV"), "Trip");
        assert_eq!(display_title("file:///docs/manual.pdf"), "manual.pdf");
    }

    #[test]
    fn test_display_title_strips_first_extension_only() {
        assert_eq!(display_title("file:///a.webm.mp4"), "a.mp4");
        assert_eq!(display_title("file:///x.avi.backup"), "x.backup");
    }

    #[test]
    fn test_display_title_tolerates_bad_escapes() {
        assert_eq!(display_title("file:///100%.mp4"), "100%");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00");
        assert_eq!(format_timestamp(5.9), "00:00:05");
        assert_eq!(format_timestamp(3725.0), "01:02:05");
        assert_eq!(format_timestamp(86_400.0 + 61.0), "00:01:01");
        assert_eq!(format_timestamp(f64::NAN), "00:00:00");
    }
}
