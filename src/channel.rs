//! Record queue shared by one producer and N consumers.
//!
//! The queue is a bounded Tokio mpsc channel. Its receiving half sits behind
//! an async mutex so any number of consumers can drain it as a work queue:
//! each record is delivered to exactly one consumer. The queue closes when
//! the producer drops its sender, and `recv` then returns `None` once the
//! remaining records are drained.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::models::CustomerRecord;

/// Consumer handle onto the shared record queue.
#[derive(Clone)]
pub struct RecordChannel {
    receiver: Arc<Mutex<mpsc::Receiver<CustomerRecord>>>,
}

impl RecordChannel {
    /// Waits for the next record.
    ///
    /// Returns `None` once the producer has finished and the queue is empty.
    pub async fn recv(&self) -> Option<CustomerRecord> {
        self.receiver.lock().await.recv().await
    }
}

/// Creates a record queue holding at most `capacity` records.
///
/// A capacity of zero is raised to one.
pub fn record_channel(capacity: usize) -> (mpsc::Sender<CustomerRecord>, RecordChannel) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        sender,
        RecordChannel {
            receiver: Arc::new(Mutex::new(receiver)),
        },
    )
}
