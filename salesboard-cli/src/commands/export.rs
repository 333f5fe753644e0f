//! Export command - write products or sales as CSV

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use salesboard_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportTarget {
    Products,
    Sales,
}

impl ExportTarget {
    fn as_str(&self) -> &'static str {
        match self {
            ExportTarget::Products => "products",
            ExportTarget::Sales => "sales",
        }
    }
}

pub fn run(target: ExportTarget, output_path: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let count = match &output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            export(&ctx, target, BufWriter::new(file))?
        }
        None => export(&ctx, target, io::stdout().lock())?,
    };

    log_event(
        &get_logger(),
        LogEvent::new("export_completed")
            .with_command("export")
            .with_detail(format!("{} {}", count, target.as_str())),
    );

    // Without --output the CSV itself went to stdout
    if let Some(path) = output_path {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "target": target.as_str(),
                    "rows": count,
                    "path": path.to_string_lossy(),
                })
            );
        } else {
            output::success(&format!(
                "Exported {} {} to {}",
                count,
                target.as_str(),
                path.display()
            ));
        }
    }

    Ok(())
}

fn export<W: io::Write>(
    ctx: &salesboard_core::SalesboardContext,
    target: ExportTarget,
    writer: W,
) -> Result<usize> {
    let count = match target {
        ExportTarget::Products => ctx.export_service.export_products(writer)?,
        ExportTarget::Sales => ctx.export_service.export_sales(writer)?,
    };
    Ok(count)
}
