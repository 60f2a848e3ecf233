//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Store operations that can fail.
///
/// Every `StoreError::Operation` names the operation it came from so a caller
/// can tell a failed `begin` from a failed `commit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum StoreOp {
    /// Opening the connection pool
    Connect,
    /// `BEGIN`
    Begin,
    /// Preparing the insert statement
    Prepare,
    /// Running the prepared insert for one record
    Execute,
    /// `COMMIT`
    Commit,
    /// `ROLLBACK`
    Rollback,
    /// Deleting every row before a policy runs
    Truncate,
    /// Counting rows after a policy runs
    Count,
    /// Reading rows back
    Fetch,
}

impl StoreOp {
    /// Human-readable operation name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOp::Connect => "connect",
            StoreOp::Begin => "begin transaction",
            StoreOp::Prepare => "prepare statement",
            StoreOp::Execute => "execute insert",
            StoreOp::Commit => "commit",
            StoreOp::Rollback => "rollback",
            StoreOp::Truncate => "truncate table",
            StoreOp::Count => "count rows",
            StoreOp::Fetch => "fetch rows",
        }
    }
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A store operation returned an error.
    #[error("{op} failed")]
    Operation {
        /// The operation that failed
        op: StoreOp,
        /// The driver error
        #[source]
        source: sqlx::Error,
    },

    /// Schema migration failed.
    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Builds a `map_err` adapter tagging an `sqlx::Error` with its operation.
    pub fn at(op: StoreOp) -> impl FnOnce(sqlx::Error) -> StoreError {
        move |source| StoreError::Operation { op, source }
    }

    /// The failing operation, if this error came from one.
    pub fn op(&self) -> Option<StoreOp> {
        match self {
            StoreError::Operation { op, .. } => Some(*op),
            StoreError::Migration(_) => None,
        }
    }
}

/// Error types for reading the CSV input.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The input file could not be opened.
    #[error("Cannot open input file {}", path.display())]
    Open {
        /// Input path
        path: PathBuf,
        /// The I/O error
        #[source]
        source: std::io::Error,
    },

    /// The header row could not be read.
    #[error("Cannot read header of {}", path.display())]
    Header {
        /// Input path
        path: PathBuf,
        /// The CSV reader error
        #[source]
        source: csv::Error,
    },

    /// The input file has no header row at all.
    #[error("Input file {} is empty, expected a header row", path.display())]
    MissingHeader {
        /// Input path
        path: PathBuf,
    },

    /// A data row could not be parsed (1-based data row number).
    #[error("Malformed row {row}: {reason}")]
    MalformedRow {
        /// 1-based data row number (the header is not counted)
        row: u64,
        /// What the reader rejected
        reason: String,
    },
}

/// Top-level error for a load run.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Input file or row errors.
    #[error(transparent)]
    Input(#[from] SourceError),

    /// Store errors.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Settings no policy can run with.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A producer or consumer task panicked or was cancelled by the runtime.
    #[error("{task} task failed: {message}")]
    TaskFailed {
        /// `producer` or `consumer N`
        task: String,
        /// The join error
        message: String,
    },
}

impl LoadError {
    /// The error message followed by its chain of causes, `: `-separated.
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    /// The failing store operation, when this is a store error.
    pub fn store_op(&self) -> Option<StoreOp> {
        match self {
            LoadError::Store(e) => e.op(),
            _ => None,
        }
    }
}
