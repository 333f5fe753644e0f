//! Sales report snapshot types

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::category::CategoryFilter;
use super::product::ProductId;
use super::sale::SaleId;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Point-in-time aggregation of the catalog joined to the ledger
#[derive(Debug, Clone, Serialize)]
pub struct ReportSnapshot {
    pub meta: ReportMeta,
    pub products: Vec<ProductLine>,
    pub sales: Vec<SaleLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub total_products: usize,
    pub total_sales: usize,
    /// Sum of `total_price` over in-scope sales whose product resolves
    pub total_profit: Decimal,
    pub generated_at: DateTime<Utc>,
    pub category_filter: CategoryFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductLine {
    pub id: ProductId,
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub description: String,
    pub total_sold: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleLine {
    pub id: SaleId,
    pub product_id: Option<ProductId>,
    /// Absent when the product reference does not resolve
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: Option<Decimal>,
    pub total_price: Decimal,
    /// `total_price - quantity * unit_price`
    pub margin: Option<Decimal>,
    pub date: NaiveDateTime,
}

impl SaleLine {
    pub fn is_resolved(&self) -> bool {
        self.product_name.is_some()
    }
}

/// Sales grouped by calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// `YYYY-MM`
    pub month_key: String,
    pub month: String,
    pub quantity: i64,
    pub total_price: Decimal,
    pub margin: Decimal,
    pub sales_count: usize,
}

impl ReportSnapshot {
    /// Group resolved sale lines by month, oldest first
    ///
    /// Covers the same sales as `total_profit`, so bucket totals add up to it.
    pub fn monthly(&self) -> Vec<MonthlyBucket> {
        let mut buckets: BTreeMap<String, MonthlyBucket> = BTreeMap::new();

        for sale in self.sales.iter().filter(|s| s.is_resolved()) {
            let key = format!("{}-{:02}", sale.date.year(), sale.date.month());
            let bucket = buckets.entry(key.clone()).or_insert_with(|| MonthlyBucket {
                month_key: key,
                month: MONTH_LABELS[sale.date.month0() as usize].to_string(),
                quantity: 0,
                total_price: Decimal::ZERO,
                margin: Decimal::ZERO,
                sales_count: 0,
            });
            bucket.quantity = bucket.quantity.saturating_add(sale.quantity);
            bucket.total_price = bucket.total_price.saturating_add(sale.total_price);
            bucket.margin = bucket.margin.saturating_add(sale.margin.unwrap_or_default());
            bucket.sales_count += 1;
        }

        buckets.into_values().collect()
    }

    /// Sum of per-product `total_sold`
    pub fn units_sold(&self) -> i64 {
        self.products
            .iter()
            .fold(0i64, |acc, p| acc.saturating_add(p.total_sold))
    }
}
