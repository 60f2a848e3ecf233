//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (queue sizes, worker counts, batch thresholds)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, MalformedRows, OnError, Opt};
