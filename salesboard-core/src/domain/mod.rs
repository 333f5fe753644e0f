//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod category;
mod product;
pub mod report;
pub mod result;
mod sale;
pub mod seed;

pub use category::{Category, CategoryFilter, CategoryId};
pub use product::{ensure_amount, ensure_price, NewProduct, Product, ProductId, MAX_AMOUNT};
pub use report::{MonthlyBucket, ProductLine, ReportMeta, ReportSnapshot, SaleLine};
pub use sale::{parse_sale_date, Sale, SaleId};
pub use seed::{SeedCounts, SeedData};
