//! Salesboard Core - catalog, ledger and sales reporting
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Category, Product, Sale, ReportSnapshot)
//! - **ports**: Trait definitions for storage (CatalogStore, LedgerStore, SeedStore)
//! - **services**: Business logic orchestration (reporting, ingestion, bootstrap)
//! - **adapters**: Concrete implementations (DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{
    Category, CategoryFilter, MonthlyBucket, NewProduct, Product, ReportSnapshot, Sale,
};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Salesboard operations
///
/// This is the primary entry point for all business logic. It holds
/// the database connection, configuration, and all services.
pub struct SalesboardContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub report_service: ReportService,
    pub ingest_service: IngestService,
    pub bootstrap_service: BootstrapService,
    pub catalog_service: CatalogService,
    pub export_service: ExportService,
    pub status_service: StatusService,
    /// Outcome of the startup bootstrap, when `seed.autoLoad` is enabled
    pub auto_seed: Option<BootstrapOutcome>,
}

impl SalesboardContext {
    /// Open (or create) the store in a data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let repository = Arc::new(DuckDbRepository::new(&config.database_path)?);
        Self::with_repository(config, repository)
    }

    /// Build the services around an already opened repository
    pub fn with_repository(config: Config, repository: Arc<DuckDbRepository>) -> Result<Self> {
        repository.ensure_schema()?;

        let report_service = ReportService::new(repository.clone(), repository.clone());
        let ingest_service =
            IngestService::new(repository.clone(), config.allowed_extensions.clone());
        let bootstrap_service = BootstrapService::new(repository.clone());
        let catalog_service = CatalogService::new(repository.clone());
        let export_service = ExportService::new(repository.clone(), repository.clone());
        let status_service = StatusService::new(repository.clone(), repository.clone());

        let auto_seed = if config.auto_seed {
            Some(bootstrap_service.run(&config.seed_dir)?)
        } else {
            None
        };

        Ok(Self {
            config,
            repository,
            report_service,
            ingest_service,
            bootstrap_service,
            catalog_service,
            export_service,
            status_service,
            auto_seed,
        })
    }
}
