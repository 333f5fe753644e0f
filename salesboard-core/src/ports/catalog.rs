//! Catalog port - categories and products

use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::{Category, CategoryFilter, CategoryId, NewProduct, Product, ProductId};

/// Storage for categories and products
///
/// Pure data access: lookups, listing and writes. Referential rules are
/// enforced by the services that call it.
pub trait CatalogStore: Send + Sync {
    // === Categories ===

    /// Get a category by ID
    fn get_category(&self, id: CategoryId) -> Result<Option<Category>>;

    /// Get a category by its exact name
    fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// All categories, ordered by ID
    fn list_categories(&self) -> Result<Vec<Category>>;

    /// Insert a category and return it with its assigned ID
    fn insert_category(&self, name: &str) -> Result<Category>;

    // === Products ===

    /// Get a product by ID
    fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Products in scope, ordered by ID
    fn list_products(&self, filter: CategoryFilter) -> Result<Vec<Product>>;

    /// Insert a batch of products in one transaction
    ///
    /// Either every product is persisted and returned with its ID, or none is.
    fn insert_products(&self, batch: &[NewProduct]) -> Result<Vec<Product>>;

    /// Set a product's price, returning the updated product if it exists
    fn update_product_price(&self, id: ProductId, price: Decimal) -> Result<Option<Product>>;
}
