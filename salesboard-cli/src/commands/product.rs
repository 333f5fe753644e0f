//! Product command - create products and change prices

use anyhow::Result;
use clap::Subcommand;
use salesboard_core::{LogEvent, NewProduct, Product};

use super::{get_context, get_logger, log_event, parse_amount};
use crate::output;

#[derive(Subcommand)]
pub enum ProductCommands {
    /// Create a single product
    New {
        /// Product name
        #[arg(long)]
        name: String,
        /// List price
        #[arg(long)]
        price: String,
        /// Category ID
        #[arg(long)]
        category_id: i64,
        /// Optional description
        #[arg(long, default_value = "")]
        description: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a product's list price
    SetPrice {
        /// Product ID
        id: i64,
        /// New price
        price: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ProductCommands) -> Result<()> {
    match command {
        ProductCommands::New {
            name,
            price,
            category_id,
            description,
            json,
        } => {
            let ctx = get_context()?;
            let product = NewProduct::new(name, parse_amount(&price)?, category_id)
                .with_description(description);
            let product = ctx.catalog_service.create_product(product)?;

            log_event(
                &get_logger(),
                LogEvent::new("product_created").with_command("product new"),
            );
            print_product(&product, "Created product", json)
        }
        ProductCommands::SetPrice { id, price, json } => {
            let ctx = get_context()?;
            let product = ctx.catalog_service.update_price(id, parse_amount(&price)?)?;

            log_event(
                &get_logger(),
                LogEvent::new("price_updated").with_command("product set-price"),
            );
            print_product(&product, "Updated product", json)
        }
    }
}

fn print_product(product: &Product, label: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(product)?);
        return Ok(());
    }

    output::success(&format!("{} {}", label, product.id));
    println!("  Name:     {}", product.name);
    println!("  Price:    {}", product.price);
    println!("  Category: {}", product.category_id);
    if !product.description.is_empty() {
        println!("  Description: {}", product.description);
    }
    Ok(())
}
