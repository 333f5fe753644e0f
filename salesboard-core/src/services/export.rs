//! Export service - catalog and ledger to CSV
//!
//! Output uses the seed file layouts, so an export directory can be loaded
//! by the bootstrap into a fresh store.

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{CategoryFilter, CategoryId, ProductId, SaleId};
use crate::ports::{CatalogStore, LedgerStore};

#[derive(Serialize)]
struct ProductRecord<'a> {
    id: ProductId,
    name: &'a str,
    description: &'a str,
    price: String,
    category_id: CategoryId,
}

#[derive(Serialize)]
struct SaleRecord {
    id: SaleId,
    product_id: Option<ProductId>,
    quantity: i64,
    total_price: String,
    date: String,
}

pub struct ExportService {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl ExportService {
    pub fn new(catalog: Arc<dyn CatalogStore>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { catalog, ledger }
    }

    /// Write all products as CSV, returning the row count
    pub fn export_products<W: Write>(&self, writer: W) -> Result<usize> {
        let products = self
            .catalog
            .list_products(CategoryFilter::All)
            .map_err(Error::into_retrieval)?;

        let mut csv = csv::Writer::from_writer(writer);
        for product in &products {
            csv.serialize(ProductRecord {
                id: product.id,
                name: &product.name,
                description: &product.description,
                price: product.price.to_string(),
                category_id: product.category_id,
            })?;
        }
        if products.is_empty() {
            csv.write_record(["id", "name", "description", "price", "category_id"])?;
        }
        csv.flush()?;

        Ok(products.len())
    }

    /// Write all sales as CSV, oldest first, returning the row count
    pub fn export_sales<W: Write>(&self, writer: W) -> Result<usize> {
        let sales = self
            .ledger
            .list_sales(CategoryFilter::All)
            .map_err(Error::into_retrieval)?;

        let mut csv = csv::Writer::from_writer(writer);
        for sale in &sales {
            csv.serialize(SaleRecord {
                id: sale.id,
                product_id: sale.product_id,
                quantity: sale.quantity,
                total_price: sale.total_price.to_string(),
                date: sale.date.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            })?;
        }
        if sales.is_empty() {
            csv.write_record(["id", "product_id", "quantity", "total_price", "date"])?;
        }
        csv.flush()?;

        Ok(sales.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::domain::{Category, NewProduct, Sale, SeedData};
    use crate::ports::SeedStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn service() -> ExportService {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        repo.load_seed(&SeedData {
            categories: vec![Category::new(1, "Books")],
            products: vec![NewProduct::new("Novel, Vol. 1", Decimal::new(1990, 2), 1)
                .with_description("paperback")
                .into_product(1)],
            sales: vec![
                Sale::new(1, Some(1), 2, Decimal::new(3980, 2), date),
                Sale::new(2, None, 1, Decimal::new(500, 2), date),
            ],
        })
        .unwrap();
        let repo = Arc::new(repo);
        ExportService::new(repo.clone(), repo)
    }

    #[test]
    fn test_export_products() {
        let mut out = Vec::new();
        let count = service().export_products(&mut out).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,name,description,price,category_id\n1,\"Novel, Vol. 1\",paperback,19.90,1\n"
        );
    }

    #[test]
    fn test_export_sales_keeps_absent_reference_empty() {
        let mut out = Vec::new();
        let count = service().export_sales(&mut out).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,product_id,quantity,total_price,date\n\
             1,1,2,39.80,2024-05-01 09:15:00\n\
             2,,1,5.00,2024-05-01 09:15:00\n"
        );
    }

    #[test]
    fn test_export_sales_keeps_fractional_seconds() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_milli_opt(9, 15, 0, 250)
            .unwrap();
        repo.load_seed(&SeedData {
            sales: vec![Sale::new(1, None, 1, Decimal::new(500, 2), date)],
            ..Default::default()
        })
        .unwrap();
        let repo = Arc::new(repo);
        let service = ExportService::new(repo.clone(), repo);

        let mut out = Vec::new();
        service.export_sales(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with(",2024-05-01 09:15:00.250\n"));

        let exported = text.trim_end().rsplit(',').next().unwrap();
        assert_eq!(crate::domain::parse_sale_date(exported), Some(date));
    }

    #[test]
    fn test_export_empty_still_writes_header() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        let repo = Arc::new(repo);
        let service = ExportService::new(repo.clone(), repo);

        let mut out = Vec::new();
        assert_eq!(service.export_sales(&mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,product_id,quantity,total_price,date\n"
        );
    }
}
