//! Embedded relational store: typed CRUD, FTS search, decay, and GC
//! (spec §4.1).
//!
//! Every public method is failure-tolerant: storage errors are logged and a
//! neutral value is returned rather than propagated, because the router's
//! never-block contract (spec §4.7, §7) requires that a hook handler never
//! fail the host process over a storage hiccup. `log_and_default` is the
//! structural seam that makes this uniform across the ~20 public methods
//! below instead of repeating a `match`/`unwrap_or_default` at each call
//! site — grounded on the teacher's `SqliteMemoryStore` delegating to
//! focused operation modules (`memory/storage/sqlite/{core,store}.rs`).

mod actions;
mod decisions;
mod learnings;
mod metrics;
mod prompts;
mod schema;
mod search;
mod sessions;
mod snapshots;
pub mod types;

pub use prompts::PromptMatch;
pub use types::*;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::error;

pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open or create the database at `path`, applying the embedded schema
    /// idempotently. Enables WAL journaling and a ≥5s busy-timeout so
    /// concurrent short-lived hook processes wait for a writer rather than
    /// failing outright (spec §4.1, §5).
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new().max_connections(4).connect_with(options).await?;

        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    /// In-memory database for tests; a shared cache keeps the pool's
    /// connections talking to the same database.
    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .create_if_missing(true)
            .shared_cache(true);
        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;
        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    async fn apply_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(schema::SCHEMA_SQL).execute(&self.pool).await?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT value FROM meta WHERE key = 'schema_version'")
                .fetch_optional(&self.pool)
                .await?;

        match existing {
            None => {
                sqlx::query("INSERT INTO meta (key, value) VALUES ('schema_version', ?)")
                    .bind(schema::SCHEMA_VERSION.to_string())
                    .execute(&self.pool)
                    .await?;
            }
            Some((value,)) => {
                let on_disk: i64 = value.parse().unwrap_or(0);
                if on_disk != schema::SCHEMA_VERSION {
                    tracing::warn!(
                        on_disk,
                        expected = schema::SCHEMA_VERSION,
                        "database schema_version does not match this build"
                    );
                }
            }
        }

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Log a storage error at `error` level and return the caller's neutral
/// fallback (spec §4.1 Failure policy).
pub(crate) fn log_storage_error<T>(operation: &str, err: sqlx::Error, fallback: T) -> T {
    error!(operation, error = %err, "store operation failed");
    fallback
}
