//! Category command - list and create categories

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Input;
use salesboard_core::LogEvent;

use super::{get_context, get_logger, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a category
    New {
        /// Category name (prompted when omitted)
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: CategoryCommands) -> Result<()> {
    match command {
        CategoryCommands::List { json } => run_list(json),
        CategoryCommands::New { name, json } => run_new(name, json),
    }
}

fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let categories = ctx.catalog_service.list_categories()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name"]);
    for category in &categories {
        table.add_row(vec![category.id.to_string(), category.name.clone()]);
    }
    println!("{}", table);

    Ok(())
}

fn run_new(name: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Category name").interact_text()?,
    };

    let category = ctx.catalog_service.create_category(&name)?;
    log_event(
        &logger,
        LogEvent::new("category_created").with_command("category new"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&category)?);
    } else {
        output::success(&format!("Created category {} ({})", category.name, category.id));
    }

    Ok(())
}
