//! Ledger port - sales

use crate::domain::result::Result;
use crate::domain::{CategoryFilter, Sale};

/// Storage for sales
pub trait LedgerStore: Send + Sync {
    /// Sales in scope, ordered by date ascending (ties by ID)
    ///
    /// With a category filter, only sales whose product belongs to that
    /// category are returned.
    fn list_sales(&self, filter: CategoryFilter) -> Result<Vec<Sale>>;
}
