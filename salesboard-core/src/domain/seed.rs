//! Initial data set for an empty store

use serde::Serialize;

use super::{Category, Product, Sale};

/// All three relations, loaded together in one transaction
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
}

impl SeedData {
    pub fn counts(&self) -> SeedCounts {
        SeedCounts {
            categories: self.categories.len(),
            products: self.products.len(),
            sales: self.sales.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    pub categories: usize,
    pub products: usize,
    pub sales: usize,
}
