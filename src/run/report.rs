//! Run reports.

use std::path::PathBuf;
use std::time::Duration;

use crate::writer::Policy;

/// Results of one policy run.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyReport {
    /// The policy that ran
    pub policy: Policy,
    /// Records the producer read from the file
    pub rows_read: u64,
    /// Records the consumers committed
    pub rows_written: u64,
    /// Rows in the table after the run
    pub rows_in_table: u64,
    /// Batches flushed at the threshold
    pub full_flushes: u64,
    /// Trailing batches flushed after the queue closed
    pub partial_flushes: u64,
    /// Wall-clock time from first read to last commit
    pub elapsed: Duration,
}

impl PolicyReport {
    /// Committed rows per second.
    pub fn rows_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rows_written as f64 / secs
        } else {
            0.0
        }
    }
}

/// A policy that failed while the run continued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyFailure {
    /// The policy that failed
    pub policy: Policy,
    /// The error with its causes
    pub message: String,
}

/// Results of a whole benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    /// Input CSV file
    pub input: PathBuf,
    /// SQLite database the policies wrote to
    pub db_path: PathBuf,
    /// Completed policies, in run order
    pub policies: Vec<PolicyReport>,
    /// Failed policies (only with `OnError::Continue`)
    pub failures: Vec<PolicyFailure>,
}

impl BenchmarkReport {
    /// The report for `policy`, if it completed.
    pub fn policy(&self, policy: Policy) -> Option<&PolicyReport> {
        self.policies.iter().find(|r| r.policy == policy)
    }

    /// Whether every policy completed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Progress notifications emitted while a benchmark runs.
#[derive(Debug)]
pub enum PolicyEvent<'a> {
    /// The table was truncated and the policy is about to start
    Started(Policy),
    /// The policy completed
    Finished(&'a PolicyReport),
    /// The policy failed
    Failed(Policy, &'a str),
}
