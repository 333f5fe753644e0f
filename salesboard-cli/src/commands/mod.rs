//! CLI command implementations

pub mod category;
pub mod export;
pub mod ingest;
pub mod logs;
pub mod product;
pub mod report;
pub mod seed;
pub mod status;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use salesboard_core::{EntryPoint, LogEvent, LoggingService, SalesboardContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SALESBOARD_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".salesboard"))
        .ok_or_else(|| anyhow!("Could not find home directory; set SALESBOARD_DIR"))
}

/// Get or create salesboard context
pub fn get_context() -> Result<SalesboardContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    SalesboardContext::new(&data_dir).context("Failed to open salesboard data")
}

/// Parse a money amount given on the command line
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| anyhow!("Invalid amount '{}'", raw))
}
