//! Exclusive write access to the store.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, MutexGuard};

/// Process-wide write gate.
///
/// Policies that serialize store access hold a `WriteGuard` for the whole
/// begin/prepare/execute/commit sequence. The orchestrator owns one gate per
/// run and hands it to each policy that needs it.
#[derive(Debug, Default)]
pub struct WriteGate {
    lock: Mutex<()>,
    acquisitions: AtomicU64,
}

/// Proof of exclusive write access, released on drop.
#[must_use = "the gate is released as soon as the guard is dropped"]
pub struct WriteGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl WriteGate {
    /// Creates an unheld gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder has the gate.
    pub async fn acquire(&self) -> WriteGuard<'_> {
        let guard = self.lock.lock().await;
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        WriteGuard { _guard: guard }
    }

    /// Total times the gate has been acquired.
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::Relaxed)
    }
}
