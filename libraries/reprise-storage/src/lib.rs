//! Reprise Storage
//!
//! Key-value store backends for Reprise, each implementing
//! [`reprise_core::KeyValueStore`] with change notification.
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local map, shared between contexts through an
//!   `Arc`. This is the fake used by every protocol test.
//! - [`SqliteStore`]: persistent `SQLite` file, used by the CLI.
//!
//! Both broadcast a [`reprise_core::StorageChange`] after every committed
//! mutation to every context holding the same store handle.
//!
//! # Example
//!
//! ```rust,no_run
//! use reprise_storage::{create_pool, run_migrations, SqliteStore};
//! use reprise_core::KeyValueStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://reprise.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteStore::new(pool);
//! store.set("user_preferred_speed", serde_json::json!(1.5)).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod sqlite;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

/// Capacity of each store's change channel before slow receivers lag
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://reprise.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = database_url, "creating sqlite pool");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let mut pool_options = SqlitePoolOptions::new().max_connections(5);

    // In-memory databases live and die with their connection, so keep exactly one alive
    if database_url.contains(":memory:") {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}
