//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Batch-level failures (`Schema`, `Commit`) and read failures (`Retrieval`)
/// are kept apart so callers can tell them from row-level ingestion errors,
/// which are returned as data and never as an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Commit failed, batch rolled back: {0}")]
    Commit(String),

    #[error("Failed to retrieve data: {0}")]
    Retrieval(String),

    #[error("Seed load failed: {0}")]
    Seed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a missing-reference error
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a seed error
    pub fn seed(msg: impl Into<String>) -> Self {
        Self::Seed(msg.into())
    }

    /// Re-signal a store fault as a read failure
    pub fn into_retrieval(self) -> Self {
        match self {
            Self::Retrieval(_) => self,
            other => Self::Retrieval(other.to_string()),
        }
    }

    /// Re-signal a store fault as a failed commit
    pub fn into_commit(self) -> Self {
        match self {
            Self::Commit(_) => self,
            other => Self::Commit(other.to_string()),
        }
    }

    /// True for a structured missing-reference condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
