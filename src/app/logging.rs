//! Progress logging utilities.

use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::writer::{Policy, WriterStats};

/// Logs progress information about a running policy.
///
/// # Arguments
///
/// * `policy` - The policy being measured
/// * `start_time` - When the policy started
/// * `stats` - Counters shared with the policy's consumers
pub fn log_progress(policy: Policy, start_time: Instant, stats: &WriterStats) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let written = stats.rows_written();
    let rate = if elapsed_secs > 0.0 {
        written as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "{}: persisted {} rows in {:.2} seconds (~{:.0} rows/sec)",
        policy.letter(),
        written,
        elapsed_secs,
        rate
    );
}

/// Spawns a task logging progress every `interval` until `cancel` fires.
pub fn spawn_progress_logger(
    policy: Policy,
    stats: Arc<WriterStats>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start_time = Instant::now();
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => log_progress(policy, start_time, &stats),
            }
        }
    })
}
