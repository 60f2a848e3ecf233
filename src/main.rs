//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `customer_load` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use customer_load::initialization::init_logger_with;
use customer_load::{
    print_benchmark_summary, run_benchmark_with, Config, Opt, PolicyEvent, PolicyObserver,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config: Config = Opt::parse().into();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let observer: PolicyObserver = Arc::new(|event: &PolicyEvent<'_>| match event {
        PolicyEvent::Started(policy) => {
            println!("Starting policy {} ...", policy.letter())
        }
        PolicyEvent::Finished(report) => println!(
            "Policy {} done in {:?}",
            report.policy.letter(),
            report.elapsed
        ),
        PolicyEvent::Failed(policy, message) => println!(
            "Policy {} failed: {}",
            policy.letter(),
            message
        ),
    });

    match run_benchmark_with(config, Some(observer)).await {
        Ok(report) => {
            print_benchmark_summary(&report);
            if !report.is_success() {
                process::exit(2);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("customer_load error: {}", e.describe());
            process::exit(1);
        }
    }
}
