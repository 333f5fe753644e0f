//! Product domain model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::CategoryId;
use super::result::{Error, Result};

pub type ProductId = i64;

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: CategoryId,
}

/// A product staged for insertion; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category_id: CategoryId,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal, category_id: CategoryId) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            category_id,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the fields that don't need the store
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("product name must not be empty"));
        }
        ensure_price(self.price)
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category_id: self.category_id,
        }
    }
}

/// Largest amount a `DECIMAL(18, 2)` column holds
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_808_348_671, 232_830_643, 0, false, 2);

/// Prices and totals are never negative
pub fn ensure_price(price: Decimal) -> Result<()> {
    ensure_amount("price", price)
}

/// An amount must be non-negative, have at most 2 decimal places and fit
/// the store's money columns
pub fn ensure_amount(field: &str, amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::validation(format!(
            "{} must be non-negative, got {}",
            field, amount
        )));
    }
    if amount.normalize().scale() > 2 {
        return Err(Error::validation(format!(
            "{} must have at most 2 decimal places, got {}",
            field, amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(Error::validation(format!(
            "{} out of range, got {}",
            field, amount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_negative_price() {
        let p = NewProduct::new("Lamp", Decimal::new(-100, 2), 1);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let p = NewProduct::new("  ", Decimal::new(100, 2), 1);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_zero_price_is_allowed() {
        assert!(ensure_price(Decimal::ZERO).is_ok());
        assert!(ensure_price(-Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_max_amount_is_column_limit() {
        assert_eq!(MAX_AMOUNT.to_string(), "9999999999999999.99");
        assert!(ensure_price(MAX_AMOUNT).is_ok());
    }

    #[test]
    fn test_price_scale_and_range() {
        assert!(ensure_price(Decimal::new(12340, 3)).is_ok());

        let err = ensure_price(Decimal::new(12345, 3)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: price must have at most 2 decimal places, got 12.345"
        );

        let err = ensure_amount("total_price", Decimal::from_scientific("1e20").unwrap()).unwrap_err();
        assert!(err.to_string().contains("total_price out of range"));
    }

    #[test]
    fn test_into_product_keeps_fields() {
        let p = NewProduct::new("Lamp", Decimal::new(1999, 2), 2).with_description("desk lamp");
        let product = p.into_product(11);
        assert_eq!(product.id, 11);
        assert_eq!(product.description, "desk lamp");
        assert_eq!(product.category_id, 2);
    }
}
