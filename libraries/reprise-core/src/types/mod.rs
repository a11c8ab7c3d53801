//! Domain types shared by the Reprise crates

mod change;
mod keys;
mod preferences;

pub use change::{StorageChange, ValueChange};
pub use keys::{
    is_document, ResourceKey, PREFERENCE_KEYS, PREF_INCOGNITO, PREF_REWIND, PREF_SPEED,
    USER_PREFERRED_SPEED,
};
pub use preferences::{PreferenceSnapshot, VisibilityFlags, VisibilityUpdate};
