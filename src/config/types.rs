//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::*;
use crate::storage::StoreOptions;
use crate::writer::Policy;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// What the record source does with a row it cannot parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MalformedRows {
    /// End the sequence at the malformed row, as if the file ended there
    Stop,
    /// Fail the policy with `SourceError::MalformedRow`
    Fail,
}

/// What the orchestrator does when a policy fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnError {
    /// Stop the whole run and return the error
    Abort,
    /// Record the failure in the report and run the next policy
    Continue,
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use customer_load::{Config, Policy};
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("customers-100.csv"),
///     policies: vec![Policy::SerialBatched],
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV file to load
    pub file: PathBuf,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Policies to run, in order
    pub policies: Vec<Policy>,

    /// Capacity of the bounded record queue (policies A, B and D)
    pub channel_capacity: usize,

    /// Records per transaction for policy C
    pub serial_batch_size: usize,

    /// Consumer count for policy B
    pub parallel_workers: usize,

    /// Consumer count for policy D
    pub parallel_batch_workers: usize,

    /// Records per transaction for each policy D consumer
    pub parallel_batch_size: usize,

    /// SQLite busy timeout in seconds
    pub busy_timeout_secs: u64,

    /// Maximum pooled SQLite connections
    pub max_connections: u32,

    /// Handling of rows the CSV reader rejects
    pub malformed_rows: MalformedRows,

    /// Handling of a failed policy
    pub on_error: OnError,

    /// Seconds between progress log lines (0 disables)
    pub progress_interval_secs: u64,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_INPUT_FILE),
            db_path: PathBuf::from(DB_PATH),
            policies: Policy::all(),
            channel_capacity: CHANNEL_CAPACITY,
            serial_batch_size: SERIAL_BATCH_SIZE,
            parallel_workers: PARALLEL_WORKERS,
            parallel_batch_workers: PARALLEL_BATCH_WORKERS,
            parallel_batch_size: PARALLEL_BATCH_SIZE,
            busy_timeout_secs: BUSY_TIMEOUT_SECS,
            max_connections: MAX_CONNECTIONS,
            malformed_rows: MalformedRows::Stop,
            on_error: OnError::Abort,
            progress_interval_secs: PROGRESS_INTERVAL_SECS,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Connection settings for the store.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            busy_timeout: Duration::from_secs(self.busy_timeout_secs),
            max_connections: self.max_connections,
        }
    }

    /// Interval for the progress logger, `None` when disabled.
    pub fn progress_interval(&self) -> Option<Duration> {
        (self.progress_interval_secs > 0).then(|| Duration::from_secs(self.progress_interval_secs))
    }

    /// Rejects settings no policy can run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.policies.is_empty() {
            return Err("at least one policy must be selected".into());
        }
        let positive = [
            ("channel capacity", self.channel_capacity),
            ("serial batch size", self.serial_batch_size),
            ("parallel workers", self.parallel_workers),
            ("parallel batch workers", self.parallel_batch_workers),
            ("parallel batch size", self.parallel_batch_size),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(format!("{name} must be greater than zero"));
        }
        if self.max_connections == 0 {
            return Err("max connections must be greater than zero".into());
        }
        Ok(())
    }
}

/// Command-line options.
///
/// Every option defaults to the benchmark's fixed configuration, so running
/// without flags reproduces the four-policy benchmark.
///
/// # Examples
///
/// ```bash
/// # All four policies against the default file
/// customer_load
///
/// # Only the batched policies, smaller input
/// customer_load customers-100.csv --policy c,d
///
/// # Policy B with fewer workers and a longer busy timeout
/// customer_load --policy b --parallel-workers 8 --busy-timeout-secs 30
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "customer_load",
    about = "Benchmarks bulk-loading customer CSV records into SQLite."
)]
pub struct Opt {
    /// CSV file to load (first row is a header)
    #[arg(value_parser, default_value = DEFAULT_INPUT_FILE)]
    pub file: PathBuf,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Policies to run, comma separated: a|b|c|d
    #[arg(
        long = "policy",
        value_enum,
        value_delimiter = ',',
        default_values_t = Policy::all()
    )]
    pub policies: Vec<Policy>,

    /// Capacity of the bounded record queue (policies A, B and D)
    #[arg(long, default_value_t = CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Records per transaction for policy C
    #[arg(long, default_value_t = SERIAL_BATCH_SIZE)]
    pub serial_batch_size: usize,

    /// Consumer count for policy B
    #[arg(long, default_value_t = PARALLEL_WORKERS)]
    pub parallel_workers: usize,

    /// Consumer count for policy D
    #[arg(long, default_value_t = PARALLEL_BATCH_WORKERS)]
    pub parallel_batch_workers: usize,

    /// Records per transaction for each policy D consumer
    #[arg(long, default_value_t = PARALLEL_BATCH_SIZE)]
    pub parallel_batch_size: usize,

    /// SQLite busy timeout in seconds
    #[arg(long, default_value_t = BUSY_TIMEOUT_SECS)]
    pub busy_timeout_secs: u64,

    /// Maximum pooled SQLite connections
    #[arg(long, default_value_t = MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Malformed row handling: stop|fail
    #[arg(long, value_enum, default_value_t = MalformedRows::Stop)]
    pub malformed_rows: MalformedRows,

    /// Policy failure handling: abort|continue
    #[arg(long, value_enum, default_value_t = OnError::Abort)]
    pub on_error: OnError,

    /// Seconds between progress log lines (0 disables)
    #[arg(long, default_value_t = PROGRESS_INTERVAL_SECS)]
    pub progress_interval_secs: u64,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            file: opt.file,
            db_path: opt.db_path,
            policies: opt.policies,
            channel_capacity: opt.channel_capacity,
            serial_batch_size: opt.serial_batch_size,
            parallel_workers: opt.parallel_workers,
            parallel_batch_workers: opt.parallel_batch_workers,
            parallel_batch_size: opt.parallel_batch_size,
            busy_timeout_secs: opt.busy_timeout_secs,
            max_connections: opt.max_connections,
            malformed_rows: opt.malformed_rows,
            on_error: opt.on_error,
            progress_interval_secs: opt.progress_interval_secs,
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default_matches_constants() {
        let config = Config::default();
        assert_eq!(config.file, PathBuf::from("customers-1m.csv"));
        assert_eq!(config.db_path, PathBuf::from("./one-mille.db"));
        assert_eq!(config.channel_capacity, 10_000);
        assert_eq!(config.serial_batch_size, 1_000);
        assert_eq!(config.parallel_workers, 50);
        assert_eq!(config.parallel_batch_workers, 10);
        assert_eq!(config.parallel_batch_size, 10_000);
        assert_eq!(config.busy_timeout_secs, 10);
        assert_eq!(config.malformed_rows, MalformedRows::Stop);
        assert_eq!(config.on_error, OnError::Abort);
        assert_eq!(
            config.policies,
            vec![
                Policy::SerialLocked,
                Policy::ParallelUnlocked,
                Policy::SerialBatched,
                Policy::ParallelBatched
            ]
        );
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = Config {
            parallel_workers: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("parallel workers"), "got: {err}");
    }

    #[test]
    fn test_validate_rejects_empty_policy_list() {
        let config = Config {
            policies: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_progress_interval_zero_disables() {
        let config = Config {
            progress_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.progress_interval(), None);
        assert_eq!(
            Config::default().progress_interval(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_opt_defaults_convert_to_default_config() {
        let opt = Opt::parse_from(["customer_load"]);
        let config = Config::from(opt);
        let default = Config::default();
        assert_eq!(config.file, default.file);
        assert_eq!(config.policies, default.policies);
        assert_eq!(config.parallel_batch_size, default.parallel_batch_size);
    }

    #[test]
    fn test_opt_parses_policy_list() {
        let opt = Opt::parse_from([
            "customer_load",
            "small.csv",
            "--policy",
            "c,d",
            "--malformed-rows",
            "fail",
            "--on-error",
            "continue",
        ]);
        assert_eq!(opt.file, PathBuf::from("small.csv"));
        assert_eq!(
            opt.policies,
            vec![Policy::SerialBatched, Policy::ParallelBatched]
        );
        assert_eq!(opt.malformed_rows, MalformedRows::Fail);
        assert_eq!(opt.on_error, OnError::Continue);
    }
}
