//! Report service - sales aggregation over catalog and ledger

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Category, CategoryFilter, Product, ProductId, ProductLine, ReportMeta, ReportSnapshot, Sale,
    SaleLine,
};
use crate::ports::{CatalogStore, LedgerStore};

/// Builds report snapshots; never writes to the stores
pub struct ReportService {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl ReportService {
    pub fn new(catalog: Arc<dyn CatalogStore>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { catalog, ledger }
    }

    /// Build a report, optionally scoped to one category
    ///
    /// Any store fault aborts the whole report as `Error::Retrieval`.
    pub fn build_report(&self, filter: CategoryFilter) -> Result<ReportSnapshot> {
        let products = self
            .catalog
            .list_products(filter)
            .map_err(Error::into_retrieval)?;
        let categories = self
            .catalog
            .list_categories()
            .map_err(Error::into_retrieval)?;
        let sales = self
            .ledger
            .list_sales(filter)
            .map_err(Error::into_retrieval)?;

        Ok(aggregate(&products, &categories, &sales, filter, Utc::now()))
    }
}

#[derive(Default)]
struct Accumulator {
    quantity: i64,
    revenue: Decimal,
}

/// Join in-scope sales to in-scope products
///
/// Sales whose product does not resolve are listed but count toward neither
/// per-product metrics nor `total_profit`.
pub fn aggregate(
    products: &[Product],
    categories: &[Category],
    sales: &[Sale],
    filter: CategoryFilter,
    generated_at: DateTime<Utc>,
) -> ReportSnapshot {
    let category_names: HashMap<_, _> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

    // Every product gets an entry so unsold products report zeros
    let mut totals: HashMap<ProductId, Accumulator> = products
        .iter()
        .map(|p| (p.id, Accumulator::default()))
        .collect();

    let mut total_profit = Decimal::ZERO;
    let mut sale_lines = Vec::with_capacity(sales.len());

    for sale in sales {
        let product = sale.product_id.and_then(|id| by_id.get(&id).copied());

        if let Some(acc) = sale.product_id.and_then(|id| totals.get_mut(&id)) {
            acc.quantity = acc.quantity.saturating_add(sale.quantity);
            acc.revenue = acc.revenue.saturating_add(sale.total_price);
            total_profit = total_profit.saturating_add(sale.total_price);
        }

        sale_lines.push(SaleLine {
            id: sale.id,
            product_id: sale.product_id,
            product_name: product.map(|p| p.name.clone()),
            quantity: sale.quantity,
            unit_price: product.map(|p| p.price),
            total_price: sale.total_price,
            margin: product.map(|p| margin(sale, p.price)),
            date: sale.date,
        });
    }

    let product_lines: Vec<ProductLine> = products
        .iter()
        .map(|p| {
            let acc = totals.remove(&p.id).unwrap_or_default();
            ProductLine {
                id: p.id,
                name: p.name.clone(),
                category: category_names.get(&p.category_id).map(|n| n.to_string()),
                price: p.price,
                description: p.description.clone(),
                total_sold: acc.quantity,
                revenue: acc.revenue,
            }
        })
        .collect();

    ReportSnapshot {
        meta: ReportMeta {
            total_products: product_lines.len(),
            total_sales: sale_lines.len(),
            total_profit,
            generated_at,
            category_filter: filter,
        },
        products: product_lines,
        sales: sale_lines,
    }
}

/// `total_price - quantity * price`, saturating at the `Decimal` bounds
fn margin(sale: &Sale, price: Decimal) -> Decimal {
    let expected = Decimal::from(sale.quantity).saturating_mul(price);
    sale.total_price.saturating_sub(expected)
}
