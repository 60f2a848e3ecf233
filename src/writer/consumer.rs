//! Consumer loops.
//!
//! Each consumer drains the shared queue until it closes or the run is
//! cancelled. Unbatched consumers write one transaction per record; batched
//! consumers accumulate their own batch and flush it at the threshold and
//! once more, with whatever is left, after the queue closes.

use std::sync::Arc;

use log::trace;
use tokio_util::sync::CancellationToken;

use crate::channel::RecordChannel;
use crate::error_handling::LoadError;
use crate::models::CustomerRecord;
use crate::storage::{CustomerStore, WriteGate};

use super::batch::{flush_batch, persist_record, Batch};
use super::stats::{FlushKind, WriterStats};

/// Everything a consumer task needs, cloned once per consumer.
#[derive(Clone)]
pub struct ConsumerContext {
    /// Shared store handle
    pub store: CustomerStore,
    /// Present when the policy serializes writes
    pub gate: Option<Arc<WriteGate>>,
    /// Counters shared by every consumer of the run
    pub stats: Arc<WriterStats>,
    /// Fired on the first failure anywhere in the run
    pub cancel: CancellationToken,
}

/// Next record, or `None` once the queue is drained or the run is cancelled.
async fn next_record(channel: &RecordChannel, cancel: &CancellationToken) -> Option<CustomerRecord> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        record = channel.recv() => record,
    }
}

/// One transaction per record. Returns the rows this consumer wrote.
pub async fn consume_unbatched(
    worker: usize,
    ctx: ConsumerContext,
    channel: RecordChannel,
) -> Result<u64, LoadError> {
    let mut written = 0u64;
    while let Some(record) = next_record(&channel, &ctx.cancel).await {
        // Held across the whole begin/prepare/execute/commit cycle.
        let _guard = match &ctx.gate {
            Some(gate) => Some(gate.acquire().await),
            None => None,
        };
        written += persist_record(&ctx.store, &record).await?;
        ctx.stats.record_rows(1);
    }
    trace!("Consumer {} finished after {} records", worker, written);
    Ok(written)
}

/// One transaction per batch of `batch_size` records. Returns the rows this
/// consumer wrote.
pub async fn consume_batched(
    worker: usize,
    ctx: ConsumerContext,
    channel: RecordChannel,
    batch_size: usize,
) -> Result<u64, LoadError> {
    let mut batch = Batch::with_threshold(batch_size);
    let mut written = 0u64;

    while let Some(record) = next_record(&channel, &ctx.cancel).await {
        if batch.push(record) {
            written += flush(&ctx, &mut batch, FlushKind::Full).await?;
        }
    }

    // A cancelled run has already failed elsewhere; its leftovers are dropped.
    if !batch.is_empty() && !ctx.cancel.is_cancelled() {
        written += flush(&ctx, &mut batch, FlushKind::Trailing).await?;
    }
    trace!("Consumer {} finished after {} records", worker, written);
    Ok(written)
}

async fn flush(ctx: &ConsumerContext, batch: &mut Batch, kind: FlushKind) -> Result<u64, LoadError> {
    let rows = {
        let _guard = match &ctx.gate {
            Some(gate) => Some(gate.acquire().await),
            None => None,
        };
        flush_batch(&ctx.store, batch.records()).await?
    };
    ctx.stats.record_flush(kind, rows);
    batch.clear();
    Ok(rows)
}
