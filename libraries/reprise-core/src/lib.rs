//! Reprise Core
//!
//! Platform-agnostic types, traits, and error handling shared by every
//! Reprise crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `ResourceKey`, `VisibilityFlags`, `StorageChange`
//! - **Core Traits**: `KeyValueStore`, the injected storage area every
//!   context reads and writes through
//! - **Configuration**: `RepriseConfig`, loaded from TOML and environment
//! - **Error Handling**: Unified `RepriseError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use reprise_core::types::{ResourceKey, VisibilityFlags};
//!
//! let key = ResourceKey::new("file:///videos/movie.mp4");
//! assert!(key.is_resumable("file://"));
//!
//! // Every control is visible until the user says otherwise
//! assert_eq!(VisibilityFlags::default(), VisibilityFlags::all_visible());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{DocumentSettings, LibrarySettings, RepriseConfig, VideoSettings};
pub use error::{RepriseError, Result};
pub use traits::{KeyValueStore, SharedStore};

pub use types::{
    is_document, PreferenceSnapshot, ResourceKey, StorageChange, ValueChange, VisibilityFlags,
    VisibilityUpdate, PREF_INCOGNITO, PREF_REWIND, PREF_SPEED, PREFERENCE_KEYS,
    USER_PREFERRED_SPEED,
};
