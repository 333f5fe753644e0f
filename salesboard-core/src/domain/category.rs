//! Category domain model and category scoping

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::result::{Error, Result};

pub type CategoryId = i64;

/// A product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Trim a category name and reject empty ones
    pub fn normalize_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("category name must not be empty"));
        }
        Ok(trimmed.to_string())
    }
}

/// Category scope for catalog and ledger queries
///
/// A sale belongs to a category through its product, so `Category(id)`
/// excludes sales whose product is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(CategoryId),
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<CategoryId>()
            .map(CategoryFilter::Category)
            .map_err(|_| Error::validation(format!("invalid category filter '{}'", s)))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Category(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CategoryFilter::All => serializer.serialize_str("all"),
            CategoryFilter::Category(id) => serializer.serialize_i64(*id),
        }
    }
}
