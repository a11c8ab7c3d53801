//! Reprise - Playback Persistence
//!
//! Resume-position and preference protocols shared by every browsing
//! context.
//!
//! This crate provides:
//! - Position persistence with completion-aware cleanup ([`ProgressTracker`])
//! - Visibility and speed preferences with cross-context change
//!   notification ([`PreferenceStore`])
//! - A per-context controller owning the incognito flag and autosave timer
//!   ([`PlaybackSession`])
//! - Keyboard shortcut mapping ([`ShortcutAction`])
//! - Debounced scroll-offset persistence for documents ([`ScrollTracker`])
//! - The resumable-item listing behind the popup ([`library`])
//!
//! # Architecture
//!
//! `reprise-playback` never talks to a concrete backend. Every component
//! takes a [`reprise_core::SharedStore`], so tests run against an
//! in-memory store and the CLI against `SQLite`. The page's video element
//! is reached through the [`MediaElement`] trait.
//!
//! # Example: Save and Restore
//!
//! ```rust
//! use reprise_core::{ResourceKey, SharedStore};
//! use reprise_playback::{ProgressTracker, SaveOutcome};
//! use reprise_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store: SharedStore = Arc::new(MemoryStore::new());
//! let tracker = ProgressTracker::new(store);
//! let key = ResourceKey::new("file:///movie.mp4");
//!
//! assert_eq!(tracker.save(&key, 5.0, 100.0, false).await, SaveOutcome::Saved(5.0));
//! assert_eq!(tracker.restore(&key).await, Some(5.0));
//!
//! // Near the end the record is purged so the next visit starts over
//! assert_eq!(tracker.save(&key, 95.0, 100.0, false).await, SaveOutcome::Cleared);
//! assert_eq!(tracker.restore(&key).await, None);
//! # }
//! ```
//!
//! # Example: Preferences Across Contexts
//!
//! ```rust
//! use reprise_core::{SharedStore, VisibilityUpdate};
//! use reprise_playback::PreferenceStore;
//! use reprise_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store: SharedStore = Arc::new(MemoryStore::new());
//! let settings_panel = PreferenceStore::new(store.clone());
//! let video_page = PreferenceStore::new(store);
//!
//! let mut changes = video_page.subscribe();
//! settings_panel
//!     .set_visibility(VisibilityUpdate { show_speed: Some(false), ..Default::default() })
//!     .await
//!     .unwrap();
//!
//! let snapshot = changes.next().await.unwrap();
//! assert!(!snapshot.visibility.show_speed);
//! assert!(snapshot.visibility.show_rewind);
//! # }
//! ```

mod error;
pub mod library;
mod media;
mod preferences;
mod progress;
mod scroll;
mod session;
mod shortcuts;

// Public exports
pub use error::{PlaybackError, Result};
pub use library::{ResumableItem, RetainedPreferences};
pub use media::MediaElement;
pub use preferences::{ListenerHandle, PreferenceStore, PreferenceSubscription, DEFAULT_SPEED};
pub use progress::{ProgressTracker, SaveOutcome, SkipReason, DEFAULT_COMPLETION_THRESHOLD};
pub use scroll::{RestoreHandle, ScrollTarget, ScrollTracker};
pub use session::{clamp_speed, PlaybackSession, SessionSnapshot};
pub use shortcuts::{KeyInput, ShortcutAction};
