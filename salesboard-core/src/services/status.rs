//! Status service - catalog and ledger summaries

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{CategoryFilter, ProductId};
use crate::ports::{CatalogStore, LedgerStore};

/// Status service for store summaries
pub struct StatusService {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl StatusService {
    pub fn new(catalog: Arc<dyn CatalogStore>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { catalog, ledger }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let categories = self
            .catalog
            .list_categories()
            .map_err(Error::into_retrieval)?;
        let products = self
            .catalog
            .list_products(CategoryFilter::All)
            .map_err(Error::into_retrieval)?;
        let sales = self
            .ledger
            .list_sales(CategoryFilter::All)
            .map_err(Error::into_retrieval)?;

        let product_ids: HashSet<ProductId> = products.iter().map(|p| p.id).collect();
        let unresolved_sales = sales
            .iter()
            .filter(|s| !s.product_id.is_some_and(|id| product_ids.contains(&id)))
            .count();

        // Sales come back date-ordered
        let fmt = |d: &chrono::NaiveDateTime| d.format("%Y-%m-%d %H:%M:%S").to_string();

        Ok(StatusSummary {
            total_categories: categories.len(),
            total_products: products.len(),
            total_sales: sales.len(),
            unresolved_sales,
            date_range: DateRange {
                earliest: sales.first().map(|s| fmt(&s.date)),
                latest: sales.last().map(|s| fmt(&s.date)),
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_categories: usize,
    pub total_products: usize,
    pub total_sales: usize,
    /// Sales with an absent or dangling product reference
    pub unresolved_sales: usize,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::domain::{Category, NewProduct, Sale, SeedData};
    use crate::ports::SeedStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_status_counts_unresolved_sales() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        let day = |d| {
            NaiveDate::from_ymd_opt(2024, 6, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        repo.load_seed(&SeedData {
            categories: vec![Category::new(1, "Books")],
            products: vec![NewProduct::new("Novel", Decimal::new(1000, 2), 1).into_product(1)],
            sales: vec![
                Sale::new(1, Some(1), 1, Decimal::new(1000, 2), day(3)),
                Sale::new(2, Some(42), 1, Decimal::new(1000, 2), day(1)),
                Sale::new(3, None, 1, Decimal::new(1000, 2), day(9)),
            ],
        })
        .unwrap();
        let repo = Arc::new(repo);

        let status = StatusService::new(repo.clone(), repo).get_status().unwrap();

        assert_eq!(status.total_categories, 1);
        assert_eq!(status.total_products, 1);
        assert_eq!(status.total_sales, 3);
        assert_eq!(status.unresolved_sales, 2);
        assert_eq!(status.date_range.earliest.as_deref(), Some("2024-06-01 00:00:00"));
        assert_eq!(status.date_range.latest.as_deref(), Some("2024-06-09 00:00:00"));
    }

    #[test]
    fn test_status_on_empty_store() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        let repo = Arc::new(repo);

        let status = StatusService::new(repo.clone(), repo).get_status().unwrap();
        assert_eq!(status.total_sales, 0);
        assert!(status.date_range.earliest.is_none());
    }
}
