//! Seed port - one-time initial load

use crate::domain::result::Result;
use crate::domain::SeedData;

pub trait SeedStore: Send + Sync {
    /// True when no category has been stored yet
    fn is_catalog_empty(&self) -> Result<bool>;

    /// Insert all seed relations in a single transaction
    fn load_seed(&self, seed: &SeedData) -> Result<()>;
}
