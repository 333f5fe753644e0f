//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod bootstrap;
mod catalog;
mod export;
pub mod ingest;
pub mod logging;
pub mod migration;
pub mod report;
mod status;

pub use bootstrap::{BootstrapOutcome, BootstrapService};
pub use catalog::CatalogService;
pub use export::ExportService;
pub use ingest::{IngestOptions, IngestService, IngestionResult, RecordSet, RowError};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use migration::{MigrationResult, MigrationService, MigrationSet};
pub use report::ReportService;
pub use status::{DateRange, StatusService, StatusSummary};
