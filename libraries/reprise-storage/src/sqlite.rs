//! `SQLite`-backed key-value store
//!
//! Every entry is one row of `kv_entries` holding JSON text. Change
//! notifications are broadcast in-process to every context sharing the
//! store handle; other processes writing the same file are not observed.

use crate::error::Result;
use crate::CHANGE_CHANNEL_CAPACITY;
use async_trait::async_trait;
use reprise_core::{KeyValueStore, StorageChange};
use serde_json::Value;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tokio::sync::{broadcast, Mutex};
use tracing::warn;

/// Persistent store with change notification
pub struct SqliteStore {
    pool: SqlitePool,
    changes: broadcast::Sender<StorageChange>,
    // Serializes commit + publish so subscribers see changes in commit order
    write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Wrap a migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            pool,
            changes,
            write_lock: Mutex::new(()),
        }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn publish(&self, change: StorageChange) {
        if !change.is_empty() {
            let _ = self.changes.send(change);
        }
    }

    async fn read(&self, key: &str) -> Result<Option<Value>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(raw,)| decode(key, raw)))
    }

    async fn read_all(&self) -> Result<HashMap<String, Value>> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM kv_entries")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(key, raw)| {
                let value = decode(&key, raw);
                (key, value)
            })
            .collect())
    }

    async fn write_many(&self, entries: Vec<(String, Value)>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;
        let mut change = StorageChange::new();
        let now = chrono::Utc::now().timestamp();

        for (key, value) in entries {
            let old = select_in(&mut tx, &key).await?;
            let encoded = serde_json::to_string(&value)?;

            sqlx::query(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(&key)
            .bind(&encoded)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if old.as_ref() != Some(&value) {
                change.insert(key, old, Some(value));
            }
        }

        tx.commit().await?;
        self.publish(change);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let old = select_in(&mut tx, key).await?;
        sqlx::query("DELETE FROM kv_entries WHERE key = ?")
            .bind(key)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        if let Some(old) = old {
            let mut change = StorageChange::new();
            change.insert(key, Some(old), None);
            self.publish(change);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM kv_entries")
            .fetch_all(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM kv_entries").execute(&mut *tx).await?;
        tx.commit().await?;

        let mut change = StorageChange::new();
        for (key, raw) in rows {
            let old = decode(&key, raw);
            change.insert(key, Some(old), None);
        }
        self.publish(change);
        Ok(())
    }
}

async fn select_in(tx: &mut Transaction<'_, Sqlite>, key: &str) -> Result<Option<Value>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_entries WHERE key = ?")
        .bind(key)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.map(|(raw,)| decode(key, raw)))
}

/// Decode stored JSON text; text that is not JSON is surfaced as a plain string
fn decode(key: &str, raw: String) -> Value {
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "stored value is not valid JSON");
            Value::String(raw)
        }
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> reprise_core::Result<Option<Value>> {
        Ok(self.read(key).await?)
    }

    async fn get_all(&self) -> reprise_core::Result<HashMap<String, Value>> {
        Ok(self.read_all().await?)
    }

    async fn set(&self, key: &str, value: Value) -> reprise_core::Result<()> {
        Ok(self.write_many(vec![(key.to_string(), value)]).await?)
    }

    async fn set_many(&self, entries: Vec<(String, Value)>) -> reprise_core::Result<()> {
        Ok(self.write_many(entries).await?)
    }

    async fn remove(&self, key: &str) -> reprise_core::Result<()> {
        Ok(self.delete(key).await?)
    }

    async fn clear(&self) -> reprise_core::Result<()> {
        Ok(self.delete_all().await?)
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}

impl From<SqlitePool> for SqliteStore {
    fn from(pool: SqlitePool) -> Self {
        Self::new(pool)
    }
}

