//! Bootstrap service - one-time seed load into an empty store
//!
//! Reads `categories.csv`, `products.csv` and `sales.csv` from a seed
//! directory. Unlike bulk ingestion the seed is all-or-nothing: the first
//! bad row aborts the load.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{
    ensure_amount, ensure_price, parse_sale_date, Category, CategoryId, Product, ProductId, Sale,
    SaleId, SeedCounts, SeedData,
};
use crate::ports::SeedStore;

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const PRODUCTS_FILE: &str = "products.csv";
pub const SALES_FILE: &str = "sales.csv";

/// What a bootstrap run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// The store already had data; nothing was read
    Skipped,
    Loaded(SeedCounts),
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: CategoryId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    id: ProductId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: Decimal,
    category_id: CategoryId,
}

#[derive(Debug, Deserialize)]
struct SaleRow {
    id: SaleId,
    product_id: Option<ProductId>,
    quantity: i64,
    total_price: Decimal,
    date: String,
}

pub struct BootstrapService {
    store: Arc<dyn SeedStore>,
}

impl BootstrapService {
    pub fn new(store: Arc<dyn SeedStore>) -> Self {
        Self { store }
    }

    /// Load the seed directory if the store is empty
    pub fn run(&self, seed_dir: &Path) -> Result<BootstrapOutcome> {
        if !self.store.is_catalog_empty()? {
            return Ok(BootstrapOutcome::Skipped);
        }

        let seed = read_seed(seed_dir)?;
        let counts = seed.counts();
        self.store
            .load_seed(&seed)
            .map_err(|e| Error::seed(e.to_string()))?;

        Ok(BootstrapOutcome::Loaded(counts))
    }
}

/// Read and cross-check all three seed files
pub fn read_seed(seed_dir: &Path) -> Result<SeedData> {
    let categories = read_categories(seed_dir)?;
    let category_ids: HashSet<CategoryId> = categories.iter().map(|c| c.id).collect();

    let products = read_products(seed_dir, &category_ids)?;
    let product_ids: HashSet<ProductId> = products.iter().map(|p| p.id).collect();

    let sales = read_sales(seed_dir, &product_ids)?;

    Ok(SeedData {
        categories,
        products,
        sales,
    })
}

fn read_categories(dir: &Path) -> Result<Vec<Category>> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    let mut categories = Vec::new();

    for (row, record) in rows::<CategoryRow>(dir, CATEGORIES_FILE)? {
        let fail = |msg: String| seed_error(CATEGORIES_FILE, row, msg);
        let record = record.map_err(fail)?;

        let name = Category::normalize_name(&record.name).map_err(|e| fail(message(e)))?;
        if !ids.insert(record.id) {
            return Err(fail(format!("duplicate category id {}", record.id)));
        }
        if !names.insert(name.clone()) {
            return Err(fail(format!("duplicate category name '{}'", name)));
        }
        categories.push(Category::new(record.id, name));
    }

    Ok(categories)
}

fn read_products(dir: &Path, category_ids: &HashSet<CategoryId>) -> Result<Vec<Product>> {
    let mut ids = HashSet::new();
    let mut products = Vec::new();

    for (row, record) in rows::<ProductRow>(dir, PRODUCTS_FILE)? {
        let fail = |msg: String| seed_error(PRODUCTS_FILE, row, msg);
        let record = record.map_err(fail)?;

        let name = record.name.trim().to_string();
        if name.is_empty() {
            return Err(fail("name is required".to_string()));
        }
        if !ids.insert(record.id) {
            return Err(fail(format!("duplicate product id {}", record.id)));
        }
        if !category_ids.contains(&record.category_id) {
            return Err(fail(format!(
                "category {} does not exist",
                record.category_id
            )));
        }
        ensure_price(record.price).map_err(|e| fail(message(e)))?;

        products.push(Product {
            id: record.id,
            name,
            description: record.description.unwrap_or_default(),
            price: record.price,
            category_id: record.category_id,
        });
    }

    Ok(products)
}

fn read_sales(dir: &Path, product_ids: &HashSet<ProductId>) -> Result<Vec<Sale>> {
    let mut ids = HashSet::new();
    let mut sales = Vec::new();

    for (row, record) in rows::<SaleRow>(dir, SALES_FILE)? {
        let fail = |msg: String| seed_error(SALES_FILE, row, msg);
        let record = record.map_err(fail)?;

        if !ids.insert(record.id) {
            return Err(fail(format!("duplicate sale id {}", record.id)));
        }
        if let Some(product_id) = record.product_id {
            if !product_ids.contains(&product_id) {
                return Err(fail(format!("product {} does not exist", product_id)));
            }
        }
        if record.quantity <= 0 {
            return Err(fail(format!(
                "quantity must be positive, got {}",
                record.quantity
            )));
        }
        ensure_amount("total_price", record.total_price).map_err(|e| fail(message(e)))?;
        let date = parse_sale_date(&record.date)
            .ok_or_else(|| fail(format!("invalid date '{}'", record.date)))?;

        sales.push(Sale::new(
            record.id,
            record.product_id,
            record.quantity,
            record.total_price,
            date,
        ));
    }

    Ok(sales)
}

/// Deserialized rows of one seed file, numbered from 1
fn rows<T>(dir: &Path, file: &str) -> Result<Vec<(usize, std::result::Result<T, String>)>>
where
    T: for<'de> Deserialize<'de>,
{
    let path = dir.join(file);
    let handle = File::open(&path)
        .map_err(|e| Error::seed(format!("{}: cannot open {}: {}", file, path.display(), e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(handle);

    Ok(reader
        .deserialize::<T>()
        .enumerate()
        .map(|(i, record)| (i + 1, record.map_err(|e| e.to_string())))
        .collect())
}

fn seed_error(file: &str, row: usize, msg: String) -> Error {
    Error::seed(format!("{} row {}: {}", file, row, msg))
}

fn message(err: Error) -> String {
    match err {
        Error::Validation(msg) => msg,
        other => other.to_string(),
    }
}
