//! Database connection pool management.
//!
//! This module initializes and configures the SQLite connection pool with:
//! - WAL mode enabled for concurrent access
//! - A busy timeout so contending writers wait for the lock instead of failing
//! - Automatic database file creation

use std::path::Path;
use std::time::Duration;

use log::{error, info, LevelFilter};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};

use crate::config::{BUSY_TIMEOUT_SECS, MAX_CONNECTIONS, POOL_ACQUIRE_TIMEOUT};
use crate::error_handling::{StoreError, StoreOp};

/// Connection settings for the store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a connection waits on a locked database before `SQLITE_BUSY`
    pub busy_timeout: Duration,
    /// Maximum pooled connections
    pub max_connections: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(BUSY_TIMEOUT_SECS),
            max_connections: MAX_CONNECTIONS,
        }
    }
}

/// Initializes and returns a database connection pool for `db_path`.
///
/// Creates the database file if it doesn't exist. Every pooled connection is
/// opened in WAL mode with the configured busy timeout.
pub async fn init_db_pool_with_path(
    db_path: &Path,
    options: &StoreOptions,
) -> Result<SqlitePool, StoreError> {
    let connect_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(options.busy_timeout)
        // One log line per insert would drown everything else.
        .log_statements(LevelFilter::Trace)
        .log_slow_statements(LevelFilter::Debug, Duration::from_secs(1));

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(POOL_ACQUIRE_TIMEOUT)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            error!("Failed to connect to database {}: {e}", db_path.display());
            StoreError::at(StoreOp::Connect)(e)
        })?;

    info!(
        "Opened database {} (WAL, busy timeout {:?}, {} connections)",
        db_path.display(),
        options.busy_timeout,
        options.max_connections
    );

    Ok(pool)
}
