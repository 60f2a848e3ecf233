//! customer_load library: bulk-loading strategies for SQLite
//!
//! This library reads customer records from a CSV file and writes them into a
//! SQLite table under four write policies, timing each one:
//!
//! - **A** one consumer, exclusive write gate around every record
//! - **B** many consumers, one transaction per record, no gate
//! - **C** one consumer, batched transactions
//! - **D** several consumers, batched transactions flushed under the gate
//!
//! # Example
//!
//! ```no_run
//! use customer_load::{run_benchmark, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("customers-100.csv"),
//!     ..Default::default()
//! };
//!
//! let report = run_benchmark(config).await?;
//! for policy in &report.policies {
//!     println!("{} took {:?}", policy.policy, policy.elapsed);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
mod channel;
pub mod config;
mod error_handling;
pub mod initialization;
mod models;
mod run;
mod source;
mod storage;
mod writer;

// Re-export public API
pub use app::print_benchmark_summary;
pub use channel::{record_channel, RecordChannel};
pub use config::{Config, LogFormat, LogLevel, MalformedRows, OnError, Opt};
pub use error_handling::{InitializationError, LoadError, SourceError, StoreError, StoreOp};
pub use models::CustomerRecord;
pub use run::{
    run_benchmark, run_benchmark_with, run_single_policy, BenchmarkReport, PolicyEvent,
    PolicyFailure, PolicyObserver, PolicyReport,
};
pub use source::{count_data_rows, RecordSource};
pub use storage::{
    run_migrations, CustomerStore, InsertTransaction, OpenTransaction, StoreOptions, WriteGate,
    WriteGuard, INSERT_CUSTOMER_SQL,
};
pub use writer::{
    flush_batch, run_policy, Batch, ChannelCapacity, Policy, PolicyPlan, WriterOutcome,
};
