/// Change notifications emitted by key-value stores
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Before/after pair for one key; `None` means absent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueChange {
    /// Value before the write
    pub old_value: Option<Value>,
    /// Value after the write
    pub new_value: Option<Value>,
}

/// One committed mutation of a store, possibly touching several keys
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageChange {
    /// Changed keys
    pub changes: HashMap<String, ValueChange>,
}

impl StorageChange {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change for `key`
    pub fn insert(&mut self, key: impl Into<String>, old_value: Option<Value>, new_value: Option<Value>) {
        self.changes.insert(
            key.into(),
            ValueChange {
                old_value,
                new_value,
            },
        );
    }

    /// Whether `key` is part of this change
    pub fn touches(&self, key: &str) -> bool {
        self.changes.contains_key(key)
    }

    /// Whether any of `keys` is part of this change
    pub fn touches_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.touches(k))
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
