//! Statistics printing.

use log::info;

use crate::run::BenchmarkReport;

/// Logs one summary line per policy plus any failures.
pub fn print_benchmark_summary(report: &BenchmarkReport) {
    info!(
        "Benchmark summary for {} -> {}:",
        report.input.display(),
        report.db_path.display()
    );
    for policy in &report.policies {
        let batches = if policy.full_flushes + policy.partial_flushes > 0 {
            format!(
                ", {} full + {} trailing batches",
                policy.full_flushes, policy.partial_flushes
            )
        } else {
            String::new()
        };
        info!(
            "   {}: {} rows in {:.3}s (~{:.0} rows/sec{})",
            policy.policy,
            policy.rows_in_table,
            policy.elapsed.as_secs_f64(),
            policy.rows_per_second(),
            batches
        );
    }
    for failure in &report.failures {
        info!("   {}: FAILED ({})", failure.policy, failure.message);
    }
}
