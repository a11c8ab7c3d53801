//! In-memory key-value store
//!
//! Holds every entry in a map behind an async lock. Contexts share one
//! instance through an `Arc`, which makes it the stand-in for the
//! browser's process-wide local storage in tests.

use crate::CHANGE_CHANNEL_CAPACITY;
use async_trait::async_trait;
use reprise_core::{KeyValueStore, Result, StorageChange};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

/// Process-local store with change notification
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
    changes: broadcast::Sender<StorageChange>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Create a store pre-populated with `entries`, without emitting changes
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            changes,
        }
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn publish(&self, change: StorageChange) {
        if change.is_empty() {
            return;
        }
        // No receivers is fine: nobody is listening yet
        let _ = self.changes.send(change);
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn get_all(&self) -> Result<HashMap<String, Value>> {
        Ok(self.entries.read().await.clone())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.set_many(vec![(key.to_string(), value)]).await
    }

    async fn set_many(&self, new_entries: Vec<(String, Value)>) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut change = StorageChange::new();

        for (key, value) in new_entries {
            let old = entries.insert(key.clone(), value.clone());
            if old.as_ref() != Some(&value) {
                change.insert(key, old, Some(value));
            }
        }

        // Publish under the lock so notifications follow commit order
        self.publish(change);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        if let Some(old) = entries.remove(key) {
            let mut change = StorageChange::new();
            change.insert(key, Some(old), None);
            self.publish(change);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut change = StorageChange::new();
        for (key, old) in entries.drain() {
            change.insert(key, Some(old), None);
        }
        self.publish(change);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
