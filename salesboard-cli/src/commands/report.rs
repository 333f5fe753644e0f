//! Report command - aggregate sales per product and per month

use anyhow::Result;
use colored::Colorize;
use salesboard_core::{CategoryFilter, LogEvent};
use serde_json::json;

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run(category: CategoryFilter, monthly: bool, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let report = match ctx.report_service.build_report(category) {
        Ok(report) => report,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("report_failed")
                    .with_command("report")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    log_event(
        &logger,
        LogEvent::new("report_built")
            .with_command("report")
            .with_detail(format!(
                "{} products, {} sales",
                report.meta.total_products, report.meta.total_sales
            )),
    );

    if json {
        if monthly {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "report": report,
                    "monthly": report.monthly(),
                }))?
            );
        } else {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        return Ok(());
    }

    println!("{}", format!("Sales Report ({})", describe(category)).bold());
    println!(
        "  Products: {}   Sales: {}   Units sold: {}   Total profit: {}",
        report.meta.total_products,
        report.meta.total_sales,
        report.units_sold(),
        report.meta.total_profit.to_string().green()
    );
    println!();

    if report.products.is_empty() {
        output::info("No products in scope.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Product", "Category", "Price", "Sold", "Revenue"]);
    for product in &report.products {
        table.add_row(vec![
            product.id.to_string(),
            product.name.clone(),
            product.category.clone().unwrap_or_else(|| "-".to_string()),
            product.price.to_string(),
            product.total_sold.to_string(),
            product.revenue.to_string(),
        ]);
    }
    println!("{}", table);

    if monthly {
        println!();
        println!("{}", "Monthly".bold());
        let mut table = output::create_table();
        table.set_header(vec!["Month", "Sales", "Units", "Total", "Margin"]);
        for bucket in report.monthly() {
            table.add_row(vec![
                format!("{} ({})", bucket.month, bucket.month_key),
                bucket.sales_count.to_string(),
                bucket.quantity.to_string(),
                bucket.total_price.to_string(),
                bucket.margin.to_string(),
            ]);
        }
        println!("{}", table);
    }

    let unresolved = report.sales.iter().filter(|s| !s.is_resolved()).count();
    if unresolved > 0 {
        println!();
        output::warning(&format!(
            "{} sale(s) without a known product were left out of the totals",
            unresolved
        ));
    }

    Ok(())
}

fn describe(category: CategoryFilter) -> String {
    match category {
        CategoryFilter::All => "all categories".to_string(),
        CategoryFilter::Category(id) => format!("category {}", id),
    }
}
