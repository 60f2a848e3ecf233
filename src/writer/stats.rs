//! Counters shared by the consumers of one policy run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Rows and flushes recorded by every consumer of a run.
#[derive(Debug, Default)]
pub struct WriterStats {
    rows_written: AtomicU64,
    full_flushes: AtomicU64,
    partial_flushes: AtomicU64,
}

/// Why a batch was flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushKind {
    /// The batch reached its threshold
    Full,
    /// The queue closed with records left in the batch
    Trailing,
}

impl WriterStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds committed rows.
    pub fn record_rows(&self, rows: u64) {
        self.rows_written.fetch_add(rows, Ordering::Relaxed);
    }

    /// Adds one committed batch of `rows` rows.
    pub fn record_flush(&self, kind: FlushKind, rows: u64) {
        self.record_rows(rows);
        match kind {
            FlushKind::Full => self.full_flushes.fetch_add(1, Ordering::Relaxed),
            FlushKind::Trailing => self.partial_flushes.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Rows committed so far.
    pub fn rows_written(&self) -> u64 {
        self.rows_written.load(Ordering::Relaxed)
    }

    /// Batches flushed at the threshold.
    pub fn full_flushes(&self) -> u64 {
        self.full_flushes.load(Ordering::Relaxed)
    }

    /// Trailing batches flushed after the queue closed.
    pub fn partial_flushes(&self) -> u64 {
        self.partial_flushes.load(Ordering::Relaxed)
    }
}
