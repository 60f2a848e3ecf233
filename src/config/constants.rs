//! Configuration constants.
//!
//! Defaults for the four-policy benchmark: input file, database file, queue
//! sizes, worker counts and batch thresholds.

use std::time::Duration;

/// Default CSV input file
pub const DEFAULT_INPUT_FILE: &str = "customers-1m.csv";
/// Default SQLite database file
pub const DB_PATH: &str = "./one-mille.db";

/// Capacity of the bounded record queue used by policies A, B and D
pub const CHANNEL_CAPACITY: usize = 10_000;

/// Consumers draining the queue under policy B
pub const PARALLEL_WORKERS: usize = 50;
/// Consumers draining the queue under policy D
pub const PARALLEL_BATCH_WORKERS: usize = 10;

/// Records per transaction under policy C
pub const SERIAL_BATCH_SIZE: usize = 1_000;
/// Records per transaction under policy D (per consumer)
pub const PARALLEL_BATCH_SIZE: usize = 10_000;

/// SQLite busy timeout in seconds.
///
/// Concurrent writers wait up to this long for the write lock before the
/// store reports `SQLITE_BUSY`. Policy B depends on it.
pub const BUSY_TIMEOUT_SECS: u64 = 10;

/// Maximum pooled SQLite connections
pub const MAX_CONNECTIONS: u32 = 16;
/// How long a consumer waits for a pooled connection
pub const POOL_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(60);

/// Seconds between progress log lines while a policy runs (0 disables)
pub const PROGRESS_INTERVAL_SECS: u64 = 5;

/// Number of fields in every data row
pub const FIELD_COUNT: usize = 7;
