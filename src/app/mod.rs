//! Main application modules.
//!
//! This module provides progress logging while a policy runs and the
//! statistics printed once the benchmark is over.

pub mod logging;
pub mod statistics;

// Re-export public API
pub use logging::spawn_progress_logger;
pub use statistics::print_benchmark_summary;
