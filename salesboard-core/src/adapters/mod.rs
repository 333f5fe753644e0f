//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the CatalogStore, LedgerStore and SeedStore ports

pub mod duckdb;
