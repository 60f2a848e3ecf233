//! Producer task feeding the record queue.

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error_handling::LoadError;
use crate::models::CustomerRecord;

use super::RecordSource;

/// Spawns the producer on the blocking pool.
///
/// Records are sent in file order. The sender is dropped when the task
/// returns, which closes the queue for every consumer; the file is closed at
/// the same point. The task resolves to the number of records sent.
///
/// The producer stops early, without error, when `cancel` fires or when every
/// consumer has gone away.
pub fn spawn_producer(
    source: RecordSource,
    sender: mpsc::Sender<CustomerRecord>,
    cancel: CancellationToken,
) -> JoinHandle<Result<u64, LoadError>> {
    tokio::task::spawn_blocking(move || -> Result<u64, LoadError> {
        let path = source.path().display().to_string();
        let mut sent = 0u64;
        for item in source {
            if cancel.is_cancelled() {
                debug!("Producer for {} cancelled after {} records", path, sent);
                break;
            }
            let record = item?;
            if sender.blocking_send(record).is_err() {
                debug!("All consumers gone, producer for {} stopping", path);
                break;
            }
            sent += 1;
        }
        debug!("Producer finished reading {} ({} records)", path, sent);
        Ok(sent)
    })
}
