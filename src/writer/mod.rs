//! Writer policies.
//!
//! A policy run wires one producer to `workers` consumers through a shared
//! record queue:
//!
//! ```text
//! RecordSource -> producer (blocking pool) -> RecordChannel -> consumer x N -> CustomerStore
//! ```
//!
//! The run returns once the producer and every consumer have finished. The
//! first failure cancels the remaining tasks and is returned after they stop.

mod batch;
mod consumer;
mod policy;
mod stats;

use std::sync::Arc;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, error};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::app::spawn_progress_logger;
use crate::channel::record_channel;
use crate::error_handling::LoadError;
use crate::source::{spawn_producer, RecordSource};
use crate::storage::{CustomerStore, WriteGate};

pub use batch::{flush_batch, Batch};
pub use policy::{ChannelCapacity, Policy, PolicyPlan};
pub use stats::WriterStats;

/// Counts collected from a completed policy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterOutcome {
    /// Records the producer sent
    pub rows_read: u64,
    /// Records committed by consumers
    pub rows_written: u64,
    /// Batches flushed because they reached the threshold
    pub full_flushes: u64,
    /// Batches flushed with the remainder after the queue closed
    pub partial_flushes: u64,
}

#[derive(Debug, Clone, Copy)]
enum TaskRole {
    Producer,
    Consumer(usize),
}

impl std::fmt::Display for TaskRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskRole::Producer => f.write_str("producer"),
            TaskRole::Consumer(i) => write!(f, "consumer {i}"),
        }
    }
}

async fn join_task(
    role: TaskRole,
    handle: JoinHandle<Result<u64, LoadError>>,
) -> (TaskRole, Result<Result<u64, LoadError>, JoinError>) {
    (role, handle.await)
}

/// Runs one policy to completion.
///
/// `capacity` is the resolved queue size. The caller truncates the table
/// beforehand; this function only streams `source` into `store`. When
/// `plan.locked` is set, every write goes through `gate`.
pub async fn run_policy(
    plan: &PolicyPlan,
    capacity: usize,
    source: RecordSource,
    store: &CustomerStore,
    gate: &Arc<WriteGate>,
    progress_interval: Option<Duration>,
) -> Result<WriterOutcome, LoadError> {
    let cancel = CancellationToken::new();
    let stats = Arc::new(WriterStats::new());
    let (sender, channel) = record_channel(capacity);

    debug!(
        "Running {} with {} worker(s), batch size {:?}, queue capacity {}",
        plan.policy, plan.workers, plan.batch_size, capacity
    );

    let progress = progress_interval.map(|interval| {
        spawn_progress_logger(plan.policy, Arc::clone(&stats), interval, cancel.child_token())
    });

    let mut tasks = FuturesUnordered::new();
    tasks.push(join_task(
        TaskRole::Producer,
        spawn_producer(source, sender, cancel.clone()),
    ));

    let ctx = consumer::ConsumerContext {
        store: store.clone(),
        gate: plan.locked.then(|| Arc::clone(gate)),
        stats: Arc::clone(&stats),
        cancel: cancel.clone(),
    };
    for worker in 0..plan.workers.max(1) {
        let ctx = ctx.clone();
        let channel = channel.clone();
        let handle = match plan.batch_size {
            Some(batch_size) => tokio::spawn(consumer::consume_batched(
                worker, ctx, channel, batch_size,
            )),
            None => tokio::spawn(consumer::consume_unbatched(worker, ctx, channel)),
        };
        tasks.push(join_task(TaskRole::Consumer(worker), handle));
    }
    // Only consumers may hold the receiver, so the producer notices when
    // they are all gone.
    drop(channel);
    drop(ctx);

    let mut rows_read = 0u64;
    let mut first_error: Option<LoadError> = None;
    while let Some((role, joined)) = tasks.next().await {
        let result = joined
            .map_err(|e| LoadError::TaskFailed {
                task: role.to_string(),
                message: e.to_string(),
            })
            .and_then(|r| r);
        match (role, result) {
            (TaskRole::Producer, Ok(sent)) => rows_read = sent,
            (TaskRole::Consumer(_), Ok(_)) => {}
            (role, Err(e)) => {
                if first_error.is_none() {
                    error!("{} {} failed: {}", plan.policy, role, e);
                    cancel.cancel();
                    first_error = Some(e);
                } else {
                    debug!("{} {} also failed: {}", plan.policy, role, e);
                }
            }
        }
    }

    // Stops the progress logger on success too.
    cancel.cancel();
    if let Some(progress) = progress {
        let _ = progress.await;
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(WriterOutcome {
            rows_read,
            rows_written: stats.rows_written(),
            full_flushes: stats.full_flushes(),
            partial_flushes: stats.partial_flushes(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MalformedRows};
    use crate::storage::test_helpers::{create_single_connection_store, create_test_store};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_with_rows(rows: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "id,name,email,company,city,country,birthday").expect("write");
        for i in 0..rows {
            writeln!(file, "{i},Name {i},n{i}@example.com,Acme,City,US,1990-01-01")
                .expect("write");
        }
        file
    }

    fn plan(policy: Policy, config: &Config) -> PolicyPlan {
        PolicyPlan::from_config(policy, config)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_serial_locked_takes_gate_once_per_record() {
        let (_dir, store) = create_test_store().await;
        let input = csv_with_rows(40);
        let gate = Arc::new(WriteGate::new());
        let source = RecordSource::open(input.path(), MalformedRows::Fail).expect("open");

        let outcome = run_policy(
            &plan(Policy::SerialLocked, &Config::default()),
            16,
            source,
            &store,
            &gate,
            None,
        )
        .await
        .expect("policy A");

        assert_eq!(outcome.rows_read, 40);
        assert_eq!(outcome.rows_written, 40);
        assert_eq!((outcome.full_flushes, outcome.partial_flushes), (0, 0));
        assert_eq!(gate.acquisitions(), 40);
        assert_eq!(store.count().await.expect("count"), 40);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_unlocked_never_touches_gate() {
        let (_dir, store) = create_test_store().await;
        let input = csv_with_rows(200);
        let gate = Arc::new(WriteGate::new());
        let source = RecordSource::open(input.path(), MalformedRows::Fail).expect("open");
        let config = Config {
            parallel_workers: 8,
            ..Default::default()
        };

        let outcome = run_policy(
            &plan(Policy::ParallelUnlocked, &config),
            32,
            source,
            &store,
            &gate,
            None,
        )
        .await
        .expect("policy B");

        assert_eq!(outcome.rows_written, 200);
        assert_eq!(gate.acquisitions(), 0);
        assert_eq!(store.count().await.expect("count"), 200);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_batched_flushes_under_gate() {
        let (_dir, store) = create_test_store().await;
        let input = csv_with_rows(1_000);
        let gate = Arc::new(WriteGate::new());
        let source = RecordSource::open(input.path(), MalformedRows::Fail).expect("open");
        let config = Config {
            parallel_batch_workers: 4,
            parallel_batch_size: 100,
            ..Default::default()
        };

        let outcome = run_policy(
            &plan(Policy::ParallelBatched, &config),
            64,
            source,
            &store,
            &gate,
            Some(Duration::from_millis(10)),
        )
        .await
        .expect("policy D");

        assert_eq!(outcome.rows_written, 1_000);
        // Every flush, full or trailing, takes the gate exactly once.
        assert_eq!(
            gate.acquisitions(),
            outcome.full_flushes + outcome.partial_flushes
        );
        assert!(outcome.partial_flushes <= 4);
        assert_eq!(store.count().await.expect("count"), 1_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_prepare_failure_cancels_run() {
        let (_dir, store) = create_single_connection_store().await;
        sqlx::query("DROP TABLE customers")
            .execute(store.pool())
            .await
            .expect("drop");
        let input = csv_with_rows(5_000);
        let gate = Arc::new(WriteGate::new());
        let source = RecordSource::open(input.path(), MalformedRows::Fail).expect("open");

        let err = run_policy(
            &plan(Policy::ParallelUnlocked, &Config::default()),
            100,
            source,
            &store,
            &gate,
            None,
        )
        .await
        .expect_err("prepare must fail");
        assert_eq!(err.store_op(), Some(crate::error_handling::StoreOp::Prepare));
    }
}
