//! Benchmark orchestration.
//!
//! For each selected policy the orchestrator opens the input, truncates the
//! table, runs the policy to completion, checks the row count and reports the
//! elapsed time. Policies never share a table state: each starts empty.

mod report;

use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};

use crate::config::{Config, OnError};
use crate::error_handling::LoadError;
use crate::source::{count_data_rows, RecordSource};
use crate::storage::{CustomerStore, WriteGate};
use crate::writer::{run_policy, ChannelCapacity, Policy, PolicyPlan};

pub use report::{BenchmarkReport, PolicyEvent, PolicyFailure, PolicyReport};

/// Callback receiving progress events; the binary prints them.
pub type PolicyObserver = Arc<dyn Fn(&PolicyEvent<'_>) + Send + Sync>;

/// Runs every configured policy against the configured database.
///
/// # Errors
///
/// With `OnError::Abort` (the default) the first failing policy ends the run
/// and its error is returned. Rows committed before the failure stay in the
/// table. Errors opening the database are always returned.
///
/// # Example
///
/// ```no_run
/// use customer_load::{run_benchmark, Config, Policy};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     file: PathBuf::from("customers-100.csv"),
///     db_path: PathBuf::from("./bench.db"),
///     policies: vec![Policy::SerialBatched, Policy::ParallelBatched],
///     ..Default::default()
/// };
/// let report = run_benchmark(config).await?;
/// for policy in &report.policies {
///     println!("{}: {:?}", policy.policy, policy.elapsed);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_benchmark(config: Config) -> Result<BenchmarkReport, LoadError> {
    run_benchmark_with(config, None).await
}

/// Like [`run_benchmark`], notifying `observer` as each policy starts and ends.
pub async fn run_benchmark_with(
    config: Config,
    observer: Option<PolicyObserver>,
) -> Result<BenchmarkReport, LoadError> {
    config.validate().map_err(LoadError::InvalidConfig)?;

    let store = CustomerStore::open(&config.db_path, &config.store_options()).await?;
    let gate = Arc::new(WriteGate::new());
    let notify = |event: PolicyEvent<'_>| {
        if let Some(observer) = &observer {
            observer(&event);
        }
    };

    let mut report = BenchmarkReport {
        input: config.file.clone(),
        db_path: config.db_path.clone(),
        policies: Vec::with_capacity(config.policies.len()),
        failures: Vec::new(),
    };

    for &policy in &config.policies {
        match run_single_policy(&config, &store, &gate, policy, &notify).await {
            Ok(policy_report) => {
                notify(PolicyEvent::Finished(&policy_report));
                report.policies.push(policy_report);
            }
            Err(e) => {
                let message = e.describe();
                notify(PolicyEvent::Failed(policy, &message));
                match config.on_error {
                    OnError::Abort => {
                        store.close().await;
                        return Err(e);
                    }
                    OnError::Continue => {
                        error!("{} failed, continuing: {}", policy, message);
                        report.failures.push(PolicyFailure { policy, message });
                    }
                }
            }
        }
    }

    store.close().await;
    Ok(report)
}

/// Truncates the table and runs one policy against it.
///
/// The input is opened (and, for a whole-input queue, counted) before any
/// store work, so an unreadable file fails without touching the table.
pub async fn run_single_policy(
    config: &Config,
    store: &CustomerStore,
    gate: &Arc<WriteGate>,
    policy: Policy,
    notify: &(dyn Fn(PolicyEvent<'_>) + Sync),
) -> Result<PolicyReport, LoadError> {
    let plan = PolicyPlan::from_config(policy, config);
    let capacity = match plan.capacity {
        ChannelCapacity::Bounded(capacity) => capacity,
        ChannelCapacity::WholeInput => {
            let rows = count_data_rows(&config.file)?;
            usize::try_from(rows).unwrap_or(usize::MAX)
        }
    };
    let source = RecordSource::open(&config.file, config.malformed_rows)?;

    store.truncate().await?;
    info!("Starting {} ...", policy);
    notify(PolicyEvent::Started(policy));

    let start = Instant::now();
    let outcome = run_policy(
        &plan,
        capacity,
        source,
        store,
        gate,
        config.progress_interval(),
    )
    .await?;
    let elapsed = start.elapsed();

    let rows_in_table = store.count().await?;
    if rows_in_table != outcome.rows_read {
        warn!(
            "{}: read {} rows but the table holds {}",
            policy, outcome.rows_read, rows_in_table
        );
    }
    info!("{} done in {:?}", policy, elapsed);

    Ok(PolicyReport {
        policy,
        rows_read: outcome.rows_read,
        rows_written: outcome.rows_written,
        rows_in_table,
        full_flushes: outcome.full_flushes,
        partial_flushes: outcome.partial_flushes,
        elapsed,
    })
}
