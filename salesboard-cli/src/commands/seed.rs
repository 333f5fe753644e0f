//! Seed command - load the initial CSV data set into an empty store

use std::path::PathBuf;

use anyhow::Result;
use salesboard_core::services::BootstrapOutcome;
use salesboard_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(dir: Option<PathBuf>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let seed_dir = dir.unwrap_or_else(|| ctx.config.seed_dir.clone());

    let outcome = match ctx.bootstrap_service.run(&seed_dir) {
        Ok(outcome) => outcome,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("seed_failed")
                    .with_command("seed")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    let detail = match &outcome {
        BootstrapOutcome::Skipped => "skipped".to_string(),
        BootstrapOutcome::Loaded(counts) => format!(
            "{} categories, {} products, {} sales",
            counts.categories, counts.products, counts.sales
        ),
    };
    log_event(
        &logger,
        LogEvent::new("seed_completed")
            .with_command("seed")
            .with_detail(detail),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        BootstrapOutcome::Skipped => {
            output::info("Store already has data; seed skipped.");
        }
        BootstrapOutcome::Loaded(counts) => {
            output::success(&format!("Seed loaded from {}", seed_dir.display()));
            println!("  Categories: {}", counts.categories);
            println!("  Products:   {}", counts.products);
            println!("  Sales:      {}", counts.sales);
        }
    }

    Ok(())
}
