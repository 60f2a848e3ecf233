//! Writer policies and their concurrency/batching plans.

use clap::ValueEnum;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::config::Config;

/// One of the four loading strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, ValueEnum)]
pub enum Policy {
    /// A: one consumer, one transaction per record, every write under the gate
    #[value(name = "a")]
    SerialLocked,
    /// B: many consumers, one transaction per record, no gate
    #[value(name = "b")]
    ParallelUnlocked,
    /// C: one consumer, one transaction per batch
    #[value(name = "c")]
    SerialBatched,
    /// D: many consumers, each flushing its own batches under the gate
    #[value(name = "d")]
    ParallelBatched,
}

impl Policy {
    /// Every policy, in benchmark order.
    pub fn all() -> Vec<Policy> {
        Policy::iter().collect()
    }

    /// Single-letter name used on the command line and in reports.
    pub fn letter(&self) -> &'static str {
        match self {
            Policy::SerialLocked => "A",
            Policy::ParallelUnlocked => "B",
            Policy::SerialBatched => "C",
            Policy::ParallelBatched => "D",
        }
    }

    /// Short description of the policy's concurrency and batching.
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::SerialLocked => "serial, unbatched, locked",
            Policy::ParallelUnlocked => "parallel, unbatched, unlocked",
            Policy::SerialBatched => "serial, batched",
            Policy::ParallelBatched => "parallel, batched, locked",
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "policy {} ({})", self.letter(), self.as_str())
    }
}

/// How large the record queue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelCapacity {
    /// A fixed number of records
    Bounded(usize),
    /// Room for every data row in the input, so the producer never waits
    WholeInput,
}

/// Concrete settings a policy runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyPlan {
    /// The policy this plan runs
    pub policy: Policy,
    /// Consumer tasks draining the queue
    pub workers: usize,
    /// Records per transaction, `None` for one transaction per record
    pub batch_size: Option<usize>,
    /// Whether every store write goes through the write gate
    pub locked: bool,
    /// Size of the record queue
    pub capacity: ChannelCapacity,
}

impl PolicyPlan {
    /// Builds the plan for `policy` from the configured sizes.
    pub fn from_config(policy: Policy, config: &Config) -> Self {
        match policy {
            Policy::SerialLocked => Self {
                policy,
                workers: 1,
                batch_size: None,
                locked: true,
                capacity: ChannelCapacity::Bounded(config.channel_capacity),
            },
            Policy::ParallelUnlocked => Self {
                policy,
                workers: config.parallel_workers,
                batch_size: None,
                locked: false,
                capacity: ChannelCapacity::Bounded(config.channel_capacity),
            },
            Policy::SerialBatched => Self {
                policy,
                workers: 1,
                batch_size: Some(config.serial_batch_size),
                locked: false,
                capacity: ChannelCapacity::WholeInput,
            },
            Policy::ParallelBatched => Self {
                policy,
                workers: config.parallel_batch_workers,
                batch_size: Some(config.parallel_batch_size),
                locked: true,
                capacity: ChannelCapacity::Bounded(config.channel_capacity),
            },
        }
    }
}
