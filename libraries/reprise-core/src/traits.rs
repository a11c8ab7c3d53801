//! Storage trait shared by every browsing context

use crate::error::Result;
use crate::types::StorageChange;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared handle to a store, cloned into every context that uses it
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Asynchronous, namespaced key-value store with change notification
///
/// This trait abstracts the host's local storage area so the resume and
/// preference protocols can run against an in-memory fake in tests and a
/// `SQLite` file in the CLI.
///
/// Writes are last-write-wins. Every committed mutation is broadcast to all
/// subscribers, including the context that made it.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read one value, `None` if the key is absent
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Read several values at once; absent keys are omitted from the map
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key).await? {
                found.insert((*key).to_string(), value);
            }
        }
        Ok(found)
    }

    /// Read every entry in the store
    async fn get_all(&self) -> Result<HashMap<String, Value>>;

    /// Write or overwrite one value
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Write several values, emitting a single change notification
    async fn set_many(&self, entries: Vec<(String, Value)>) -> Result<()>;

    /// Remove one value. Removing an absent key is not an error and emits nothing.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Remove every entry
    async fn clear(&self) -> Result<()>;

    /// Subscribe to change notifications
    ///
    /// Receivers that fall behind see `RecvError::Lagged`; they should treat
    /// it as "something changed" and re-read what they care about.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}
