//! Status command - show catalog and ledger summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Sales Data Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Categories", &status.total_categories.to_string()]);
    table.add_row(vec!["Products", &status.total_products.to_string()]);
    table.add_row(vec!["Sales", &status.total_sales.to_string()]);

    println!("{}", table);
    println!();

    if let (Some(earliest), Some(latest)) = (&status.date_range.earliest, &status.date_range.latest) {
        println!("Date range: {} to {}", earliest, latest);
        println!();
    }

    if status.unresolved_sales > 0 {
        println!(
            "{}",
            format!(
                "{} sale(s) reference no known product and are left out of totals",
                status.unresolved_sales
            )
            .yellow()
        );
    }

    println!("Database: {}", ctx.config.database_path.display());

    Ok(())
}
