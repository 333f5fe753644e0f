//! Salesboard CLI - sales reporting and catalog ingestion in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use salesboard_core::CategoryFilter;

mod commands;
mod output;

use commands::{category, export, ingest, logs, product, report, seed, status};

/// Salesboard - sales reporting and catalog ingestion
#[derive(Parser)]
#[command(name = "sb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show catalog and ledger summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Aggregate sales per product
    Report {
        /// Category ID, or "all"
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// Also group sales by month
        #[arg(long)]
        monthly: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Bulk-create products from a CSV file
    Ingest {
        /// Path to CSV file (columns: name, price, category_id, optional description)
        file: PathBuf,
        /// Validate without creating anything
        #[arg(long)]
        preview: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load the seed CSV files into an empty store
    Seed {
        /// Seed directory (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        command: category::CategoryCommands,
    },

    /// Manage products
    Product {
        #[command(subcommand)]
        command: product::ProductCommands,
    },

    /// Export products or sales as CSV
    Export {
        /// What to export
        #[arg(value_enum)]
        target: export::ExportTarget,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Report { category, monthly, json } => report::run(category, monthly, json),
        Commands::Ingest { file, preview, json } => ingest::run(file, preview, json),
        Commands::Seed { dir, json } => seed::run(dir, json),
        Commands::Category { command } => category::run(command),
        Commands::Product { command } => product::run(command),
        Commands::Export { target, output, json } => export::run(target, output, json),
        Commands::Logs { command } => logs::run(command),
    }
}
