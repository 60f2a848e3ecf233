//! Logger initialization.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first. `level` then replaces its default level and any
/// rule for this crate, while rules for other modules are kept. `sqlx` is
/// held at `warn` unless `RUST_LOG` has a rule for it, so
/// `RUST_LOG=sqlx=trace` still shows every statement.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Show every SQL statement sqlx runs
/// RUST_LOG=sqlx=trace customer_load customers-100.csv --policy c
///
/// # Structured output for scraping benchmark timings
/// customer_load customers-1m.csv --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let env_filters = std::env::var("RUST_LOG").ok();
    let mut builder = build_logger(level, format, env_filters.as_deref());
    if let Ok(style) = std::env::var("RUST_LOG_STYLE") {
        builder.parse_write_style(&style);
    }
    // try_init so tests can call this more than once
    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}

/// Whether `filters` (in `RUST_LOG` syntax) has a rule for `module` or one of
/// its submodules.
fn has_module_rule(filters: &str, module: &str) -> bool {
    let directives = filters.split('/').next().unwrap_or_default();
    directives.split(',').any(|directive| {
        let name = directive.split('=').next().unwrap_or_default().trim();
        name == module
            || name
                .strip_prefix(module)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

fn build_logger(
    level: LevelFilter,
    format: LogFormat,
    env_filters: Option<&str>,
) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    if let Some(filters) = env_filters {
        builder.parse_filters(filters);
    }

    builder.filter_level(level);
    // Per-statement logging from sqlx is noisy at info; the pool sets its own levels
    if !env_filters.is_some_and(|filters| has_module_rule(filters, "sqlx")) {
        builder.filter_module("sqlx", LevelFilter::Warn);
    }
    builder.filter_module("customer_load", level);

    match format {
        LogFormat::Json => {
            colored::control::set_override(false);
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            colored::control::set_override(true);
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    builder
}
