//! Application initialization.
//!
//! Sets up the process-wide logger. The store and the record queue are
//! created per run by the orchestrator.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
