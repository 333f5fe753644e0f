//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for storage. The services depend only on
//! these traits, not on concrete implementations.

mod catalog;
mod ledger;
mod seed;

pub use catalog::CatalogStore;
pub use ledger::LedgerStore;
pub use seed::SeedStore;
