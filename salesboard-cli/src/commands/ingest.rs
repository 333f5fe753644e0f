//! Ingest command - bulk product import from CSV

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use salesboard_core::services::IngestOptions;
use salesboard_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(file: PathBuf, preview: bool, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    log_event(&logger, LogEvent::new("ingest_started").with_command("ingest"));

    let result = match ctx.ingest_service.ingest_file(&file, &IngestOptions { preview }) {
        Ok(result) => result,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("ingest_failed")
                    .with_command("ingest")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    log_event(
        &logger,
        LogEvent::new("ingest_completed")
            .with_command("ingest")
            .with_detail(format!(
                "{} staged, {} rejected{}",
                result.success_count,
                result.errors.len(),
                if preview { ", preview" } else { "" }
            )),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if preview {
        output::info(&format!(
            "Preview: {} product(s) would be created (batch {})",
            result.success_count, result.batch_id
        ));
    } else if result.success_count > 0 {
        output::success(&format!(
            "Created {} product(s) (batch {})",
            result.success_count, result.batch_id
        ));
    } else {
        output::warning("No products created");
    }

    if !result.errors.is_empty() {
        println!();
        println!("{}", format!("{} row(s) rejected:", result.errors.len()).red().bold());
        for error in &result.errors {
            println!("  {}", error);
        }
    }

    Ok(())
}
