//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use duckdb::types::Type;
use duckdb::{params, Connection};
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{
    parse_sale_date, Category, CategoryFilter, CategoryId, NewProduct, Product, ProductId, Sale,
    SeedData,
};
use crate::migrations::MIGRATIONS;
use crate::ports::{CatalogStore, LedgerStore, SeedStore};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const CATEGORY_COLUMNS: &str = "id, name";
const PRODUCT_COLUMNS: &str = "id, name, description, price::VARCHAR, category_id";
const SALE_COLUMNS: &str = "s.id, s.product_id, s.quantity, s.total_price::VARCHAR, s.date::VARCHAR";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// DuckDB repository implementation
///
/// Implements all three storage ports over one connection. The connection
/// is guarded by a mutex, so calls from one process never interleave.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open (or create) a database file
    ///
    /// Retries with exponential backoff when another process holds the
    /// file lock.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[salesboard] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!(
                "Failed to open database after {} retries",
                MAX_RETRIES
            ))
        }))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; nothing here needs extensions
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Apply pending sales-database migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Path of the database file, `None` for in-memory databases
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

impl CatalogStore for DuckDbRepository {
    fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories WHERE id = ?",
            CATEGORY_COLUMNS
        ))?;
        let mut rows = stmt.query_map([id], row_to_category)?;
        Ok(rows.next().transpose()?)
    }

    fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories WHERE name = ?",
            CATEGORY_COLUMNS
        ))?;
        let mut rows = stmt.query_map([name], row_to_category)?;
        Ok(rows.next().transpose()?)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories ORDER BY id",
            CATEGORY_COLUMNS
        ))?;
        let categories = stmt
            .query_map([], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn insert_category(&self, name: &str) -> Result<Category> {
        let conn = self.lock()?;
        let id: i64 = conn.query_row(
            "SELECT COALESCE(MAX(id), 0) + 1 FROM categories",
            [],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO categories (id, name) VALUES (?, ?)",
            params![id, name],
        )?;
        Ok(Category::new(id, name))
    }

    fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let conn = self.lock()?;
        query_product(&conn, id)
    }

    fn list_products(&self, filter: CategoryFilter) -> Result<Vec<Product>> {
        let conn = self.lock()?;
        let products = match filter {
            CategoryFilter::All => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM products ORDER BY id",
                    PRODUCT_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([], row_to_product)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            CategoryFilter::Category(category_id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM products WHERE category_id = ? ORDER BY id",
                    PRODUCT_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([category_id], row_to_product)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(products)
    }

    fn insert_products(&self, batch: &[NewProduct]) -> Result<Vec<Product>> {
        let mut conn = self.lock()?;
        // Dropping the transaction without commit rolls everything back
        let tx = conn.transaction()?;

        let mut next_id: i64 =
            tx.query_row("SELECT COALESCE(MAX(id), 0) FROM products", [], |row| {
                row.get(0)
            })?;
        let mut inserted = Vec::with_capacity(batch.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (id, name, description, price, category_id)
                 VALUES (?, ?, ?, CAST(? AS DECIMAL(18, 2)), ?)",
            )?;
            for staged in batch {
                next_id += 1;
                let product = staged.clone().into_product(next_id);
                stmt.execute(params![
                    product.id,
                    product.name,
                    product.description,
                    product.price.to_string(),
                    product.category_id,
                ])?;
                inserted.push(product);
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn update_product_price(&self, id: ProductId, price: Decimal) -> Result<Option<Product>> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE products SET price = CAST(? AS DECIMAL(18, 2)) WHERE id = ?",
            params![price.to_string(), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        query_product(&conn, id)
    }
}

impl LedgerStore for DuckDbRepository {
    fn list_sales(&self, filter: CategoryFilter) -> Result<Vec<Sale>> {
        let conn = self.lock()?;
        let sales = match filter {
            CategoryFilter::All => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM sales s ORDER BY s.date, s.id",
                    SALE_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([], row_to_sale)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            CategoryFilter::Category(category_id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM sales s
                     JOIN products p ON p.id = s.product_id
                     WHERE p.category_id = ?
                     ORDER BY s.date, s.id",
                    SALE_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([category_id], row_to_sale)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(sales)
    }
}

impl SeedStore for DuckDbRepository {
    fn is_catalog_empty(&self) -> Result<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    fn load_seed(&self, seed: &SeedData) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO categories (id, name) VALUES (?, ?)")?;
            for category in &seed.categories {
                stmt.execute(params![category.id, category.name])?;
            }
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (id, name, description, price, category_id)
                 VALUES (?, ?, ?, CAST(? AS DECIMAL(18, 2)), ?)",
            )?;
            for product in &seed.products {
                stmt.execute(params![
                    product.id,
                    product.name,
                    product.description,
                    product.price.to_string(),
                    product.category_id,
                ])?;
            }
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO sales (id, product_id, quantity, total_price, date)
                 VALUES (?, ?, ?, CAST(? AS DECIMAL(18, 2)), CAST(? AS TIMESTAMP))",
            )?;
            for sale in &seed.sales {
                stmt.execute(params![
                    sale.id,
                    sale.product_id,
                    sale.quantity,
                    sale.total_price.to_string(),
                    format_timestamp(&sale.date),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

// Helper functions

fn query_product(conn: &Connection, id: ProductId) -> Result<Option<Product>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM products WHERE id = ?",
        PRODUCT_COLUMNS
    ))?;
    let mut rows = stmt.query_map([id], row_to_product)?;
    Ok(rows.next().transpose()?)
}

fn row_to_category(row: &duckdb::Row) -> duckdb::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn row_to_product(row: &duckdb::Row) -> duckdb::Result<Product> {
    // Column indices from PRODUCT_COLUMNS:
    // 0: id, 1: name, 2: description, 3: price, 4: category_id
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        price: decimal_column(row, 3)?,
        category_id: row.get(4)?,
    })
}

fn row_to_sale(row: &duckdb::Row) -> duckdb::Result<Sale> {
    // Column indices from SALE_COLUMNS:
    // 0: id, 1: product_id, 2: quantity, 3: total_price, 4: date
    let raw_date: String = row.get(4)?;
    let date = parse_sale_date(&raw_date).ok_or_else(|| {
        duckdb::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("invalid timestamp '{}'", raw_date).into(),
        )
    })?;

    Ok(Sale {
        id: row.get(0)?,
        product_id: row.get(1)?,
        quantity: row.get(2)?,
        total_price: decimal_column(row, 3)?,
        date,
    })
}

/// DECIMAL columns are selected as VARCHAR to keep full precision
fn decimal_column(row: &duckdb::Row, idx: usize) -> duckdb::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn format_timestamp(dt: &chrono::NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}
