//! Record batches and batch flushing.

use log::{debug, warn};

use crate::error_handling::StoreError;
use crate::models::CustomerRecord;
use crate::storage::CustomerStore;

/// Records accumulated by one consumer until the threshold is reached.
#[derive(Debug)]
pub struct Batch {
    records: Vec<CustomerRecord>,
    threshold: usize,
}

impl Batch {
    /// Creates an empty batch that is full at `threshold` records.
    pub fn with_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            records: Vec::with_capacity(threshold),
            threshold,
        }
    }

    /// Appends a record, returning `true` when the batch is now full.
    pub fn push(&mut self, record: CustomerRecord) -> bool {
        self.records.push(record);
        self.records.len() >= self.threshold
    }

    /// Records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The held records, in arrival order.
    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    /// Empties the batch, keeping its allocation for the next round.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Writes `records` in a single transaction.
///
/// One statement is prepared and executed once per record. If an execute
/// fails the transaction is rolled back before the error is returned, so a
/// failed flush leaves nothing behind. Returns the rows committed.
pub async fn flush_batch(
    store: &CustomerStore,
    records: &[CustomerRecord],
) -> Result<u64, StoreError> {
    let mut tx = store.begin().await?.prepare_insert().await?;
    for record in records {
        if let Err(e) = tx.execute(record).await {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed insert also failed: {rollback_err}");
            }
            return Err(e);
        }
    }
    let committed = tx.commit().await?;
    debug!("Flushed batch of {} records", committed);
    Ok(committed)
}

/// Writes one record in its own transaction.
pub async fn persist_record(
    store: &CustomerStore,
    record: &CustomerRecord,
) -> Result<u64, StoreError> {
    flush_batch(store, std::slice::from_ref(record)).await
}
