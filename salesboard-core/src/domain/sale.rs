//! Sale domain model

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::ProductId;

pub type SaleId = i64;

/// A ledger entry recording units of one product sold
///
/// `product_id` is a soft reference: it may be absent, and a present id may
/// name a product that no longer exists. `total_price` is stored as sold and
/// can diverge from `quantity * price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub product_id: Option<ProductId>,
    pub quantity: i64,
    pub total_price: Decimal,
    pub date: NaiveDateTime,
}

impl Sale {
    pub fn new(
        id: SaleId,
        product_id: Option<ProductId>,
        quantity: i64,
        total_price: Decimal,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            total_price,
            date,
        }
    }
}

/// Parse a sale timestamp; bare dates are taken at midnight
pub fn parse_sale_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    for fmt in &date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
