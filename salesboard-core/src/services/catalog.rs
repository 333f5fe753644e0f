//! Catalog service - single-record category and product maintenance

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{ensure_price, Category, NewProduct, Product, ProductId};
use crate::ports::CatalogStore;

pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.catalog.list_categories()
    }

    /// Create a category; names are trimmed and must be unique
    pub fn create_category(&self, name: &str) -> Result<Category> {
        let name = Category::normalize_name(name)?;
        if self.catalog.find_category_by_name(&name)?.is_some() {
            return Err(Error::validation(format!(
                "category '{}' already exists",
                name
            )));
        }
        self.catalog.insert_category(&name)
    }

    /// Create one product under an existing category
    pub fn create_product(&self, product: NewProduct) -> Result<Product> {
        let product = NewProduct {
            name: product.name.trim().to_string(),
            ..product
        };
        product.validate()?;

        if self.catalog.get_category(product.category_id)?.is_none() {
            return Err(Error::not_found("category", product.category_id));
        }

        self.catalog
            .insert_products(std::slice::from_ref(&product))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::database("insert returned no product"))
    }

    pub fn update_price(&self, id: ProductId, price: Decimal) -> Result<Product> {
        ensure_price(price)?;
        self.catalog
            .update_product_price(id, price)?
            .ok_or_else(|| Error::not_found("product", id))
    }

    pub fn get_product(&self, id: ProductId) -> Result<Product> {
        self.catalog
            .get_product(id)?
            .ok_or_else(|| Error::not_found("product", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;

    fn service() -> CatalogService {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        CatalogService::new(Arc::new(repo))
    }

    #[test]
    fn test_create_category_rejects_duplicates() {
        let service = service();
        let books = service.create_category("  Books ").unwrap();
        assert_eq!(books.name, "Books");

        let err = service.create_category("Books").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(service.create_category("   ").is_err());
        assert_eq!(service.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_create_product_requires_category() {
        let service = service();
        let err = service
            .create_product(NewProduct::new("Lamp", Decimal::new(1500, 2), 3))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "category 3 does not exist");

        let category = service.create_category("Home").unwrap();
        let lamp = service
            .create_product(NewProduct::new(" Lamp ", Decimal::new(1500, 2), category.id))
            .unwrap();
        assert_eq!(lamp.name, "Lamp");
        assert_eq!(service.get_product(lamp.id).unwrap(), lamp);
    }

    #[test]
    fn test_update_price() {
        let service = service();
        let category = service.create_category("Home").unwrap();
        let lamp = service
            .create_product(NewProduct::new("Lamp", Decimal::new(1500, 2), category.id))
            .unwrap();

        let updated = service.update_price(lamp.id, Decimal::new(1250, 2)).unwrap();
        assert_eq!(updated.price, Decimal::new(1250, 2));

        assert!(service.update_price(lamp.id, Decimal::new(-1, 0)).is_err());
        assert!(service
            .update_price(999, Decimal::ONE)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_prices_must_fit_money_column() {
        let service = service();
        let category = service.create_category("Home").unwrap();

        let err = service
            .create_product(NewProduct::new("Lamp", Decimal::new(12345, 3), category.id))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let lamp = service
            .create_product(NewProduct::new("Lamp", Decimal::new(1500, 2), category.id))
            .unwrap();
        let err = service
            .update_price(lamp.id, Decimal::new(1999, 3))
            .unwrap_err();
        assert!(err.to_string().contains("at most 2 decimal places"));

        let too_big = crate::domain::MAX_AMOUNT + Decimal::new(1, 2);
        assert!(service.update_price(lamp.id, too_big).is_err());
        assert_eq!(service.get_product(lamp.id).unwrap().price, Decimal::new(1500, 2));
    }
}
