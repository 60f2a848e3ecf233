//! Error handling.
//!
//! Errors are grouped the way a load run can fail:
//! - **Input**: the file or its header cannot be read, or a row is malformed
//! - **Store**: a begin/prepare/execute/commit/rollback/truncate call failed
//! - **Task**: a producer or consumer task died without returning
//!
//! Nothing in the pipeline retries. Every error travels back to the
//! orchestrator, which aborts the run or records the failure.

mod types;

// Re-export public API
pub use types::{InitializationError, LoadError, SourceError, StoreError, StoreOp};
