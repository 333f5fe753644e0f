//! Ingest service - bulk product import from CSV
//!
//! Two phases: every row is validated and staged on its own, producing
//! either a `NewProduct` or a `RowError`; then all staged products are
//! committed in one transaction.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{ensure_price, CategoryId, NewProduct, ProductId};
use crate::ports::CatalogStore;

/// Columns every ingestion batch must carry
pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "price", "category_id"];

const DESCRIPTION_COLUMN: &str = "description";

/// Tabular input: column names plus rows of raw string cells
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Read CSV with a header row
    ///
    /// Header names are trimmed. Rows may be shorter or longer than the
    /// header; missing cells read as absent.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(Error::schema("CSV file is empty"));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Read a CSV file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Validation failure for one input row; `row` is 1-indexed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.message)
    }
}

/// Ingest options
#[derive(Debug, Default, Clone)]
pub struct IngestOptions {
    /// Validate and stage without committing
    pub preview: bool,
}

#[derive(Debug, Serialize)]
pub struct IngestionResult {
    /// Unique batch ID for this ingestion
    pub batch_id: String,
    /// Rows that passed validation (and were committed unless previewing)
    pub success_count: usize,
    /// Row-level errors in input order; empty for a clean batch
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RowError>,
    /// IDs of created products
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<ProductId>,
    /// Whether this was a preview (no changes applied)
    pub preview: bool,
}

impl IngestionResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Bulk ingestion engine
pub struct IngestService {
    catalog: Arc<dyn CatalogStore>,
    allowed_extensions: Vec<String>,
}

impl IngestService {
    pub fn new(catalog: Arc<dyn CatalogStore>, allowed_extensions: Vec<String>) -> Self {
        Self {
            catalog,
            allowed_extensions,
        }
    }

    /// Ingest a CSV file after checking its extension
    pub fn ingest_file(&self, path: &Path, options: &IngestOptions) -> Result<IngestionResult> {
        self.check_extension(path)?;
        let records = RecordSet::from_path(path)?;
        self.ingest(&records, options)
    }

    /// Validate every row, then commit the valid ones together
    ///
    /// A missing required column rejects the batch before any row is read.
    /// Invalid rows are reported in `errors` and skipped. If the commit
    /// fails nothing is persisted and `Error::Commit` is returned.
    pub fn ingest(&self, records: &RecordSet, options: &IngestOptions) -> Result<IngestionResult> {
        let columns = check_schema(records)?;

        let mut staged = Vec::new();
        let mut errors = Vec::new();
        let mut known_categories: HashMap<CategoryId, bool> = HashMap::new();

        for (index, row) in records.rows.iter().enumerate() {
            let row_number = index + 1;
            match self.stage_row(row, &columns, &mut known_categories)? {
                Ok(product) => staged.push(product),
                Err(message) => errors.push(RowError {
                    row: row_number,
                    message,
                }),
            }
        }

        let success_count = staged.len();
        let product_ids = if options.preview || staged.is_empty() {
            Vec::new()
        } else {
            self.catalog
                .insert_products(&staged)
                .map_err(Error::into_commit)?
                .into_iter()
                .map(|p| p.id)
                .collect()
        };

        Ok(IngestionResult {
            batch_id: format!("ingest_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")),
            success_count,
            errors,
            product_ids,
            preview: options.preview,
        })
    }

    /// Outer `Err` is a store fault; inner `Err` is the row's error message
    fn stage_row(
        &self,
        row: &[String],
        columns: &Columns,
        known_categories: &mut HashMap<CategoryId, bool>,
    ) -> Result<std::result::Result<NewProduct, String>> {
        let cell = |idx: usize| row.get(idx).map(|s| s.as_str()).unwrap_or("");

        let raw_category = cell(columns.category_id);
        let category_id = match raw_category.parse::<CategoryId>() {
            Ok(id) => id,
            Err(_) => return Ok(Err(format!("invalid category_id '{}'", raw_category))),
        };

        let exists = match known_categories.get(&category_id) {
            Some(exists) => *exists,
            None => {
                let exists = self
                    .catalog
                    .get_category(category_id)
                    .map_err(Error::into_retrieval)?
                    .is_some();
                known_categories.insert(category_id, exists);
                exists
            }
        };
        if !exists {
            return Ok(Err(format!("category {} does not exist", category_id)));
        }

        let name = cell(columns.name);
        if name.is_empty() {
            return Ok(Err("name is required".to_string()));
        }

        let raw_price = cell(columns.price);
        let price = match parse_price(raw_price) {
            Some(price) => price,
            None => return Ok(Err(format!("invalid price '{}'", raw_price))),
        };
        if let Err(e) = ensure_price(price) {
            return Ok(Err(match e {
                Error::Validation(msg) => msg,
                other => other.to_string(),
            }));
        }

        let description = columns
            .description
            .map(cell)
            .unwrap_or_default()
            .to_string();

        Ok(Ok(NewProduct::new(name, price, category_id).with_description(description)))
    }

    fn check_extension(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension {
            Some(ext) if self.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => {
                Ok(())
            }
            _ => Err(Error::validation(format!(
                "file type not allowed: {} (expected {})",
                path.display(),
                self.allowed_extensions.join(", ")
            ))),
        }
    }
}

struct Columns {
    name: usize,
    price: usize,
    category_id: usize,
    description: Option<usize>,
}

fn check_schema(records: &RecordSet) -> Result<Columns> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !records.has_column(c))
        .collect();

    match (
        records.column_index("name"),
        records.column_index("price"),
        records.column_index("category_id"),
    ) {
        (Some(name), Some(price), Some(category_id)) => Ok(Columns {
            name,
            price,
            category_id,
            description: records.column_index(DESCRIPTION_COLUMN),
        }),
        _ => Err(Error::schema(format!(
            "CSV must contain the columns: {} (missing: {})",
            REQUIRED_COLUMNS.join(", "),
            missing.join(", ")
        ))),
    }
}

fn parse_price(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(csv: &str) -> RecordSet {
        RecordSet::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_record_set_reads_headers_and_rows() {
        let set = records("name, price ,category_id\nLamp,10.5,1\nDesk,99,2\n");
        assert_eq!(set.columns(), &["name", "price", "category_id"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_input_is_schema_error() {
        let err = RecordSet::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_check_schema_lists_missing_columns() {
        let set = records("name,category_id\nLamp,1\n");
        let err = check_schema(&set).err().unwrap();
        match err {
            Error::Schema(msg) => assert!(msg.contains("missing: price")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_schema_finds_optional_description() {
        let set = records("category_id,description,price,name\n");
        let columns = check_schema(&set).unwrap();
        assert_eq!(columns.name, 3);
        assert_eq!(columns.description, Some(1));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12.50"), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_price(" 3 "), Some(Decimal::new(3, 0)));
        assert_eq!(parse_price("1e2"), Some(Decimal::new(100, 0)));
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
    }

    mod with_store {
        use super::*;
        use crate::adapters::duckdb::DuckDbRepository;
        use crate::domain::{Category, CategoryFilter, Product, SeedData};
        use crate::ports::SeedStore;

        /// Delegates reads, refuses every batch insert
        struct FailingCatalog(DuckDbRepository);

        impl CatalogStore for FailingCatalog {
            fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
                self.0.get_category(id)
            }
            fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
                self.0.find_category_by_name(name)
            }
            fn list_categories(&self) -> Result<Vec<Category>> {
                self.0.list_categories()
            }
            fn insert_category(&self, name: &str) -> Result<Category> {
                self.0.insert_category(name)
            }
            fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
                self.0.get_product(id)
            }
            fn list_products(&self, filter: CategoryFilter) -> Result<Vec<Product>> {
                self.0.list_products(filter)
            }
            fn insert_products(&self, _batch: &[NewProduct]) -> Result<Vec<Product>> {
                Err(Error::database("disk full"))
            }
            fn update_product_price(
                &self,
                id: ProductId,
                price: Decimal,
            ) -> Result<Option<Product>> {
                self.0.update_product_price(id, price)
            }
        }

        fn store() -> DuckDbRepository {
            let repo = DuckDbRepository::open_in_memory().unwrap();
            repo.ensure_schema().unwrap();
            repo.load_seed(&SeedData {
                categories: vec![Category::new(1, "Books"), Category::new(2, "Games")],
                ..Default::default()
            })
            .unwrap();
            repo
        }

        fn service(repo: DuckDbRepository) -> (Arc<DuckDbRepository>, IngestService) {
            let repo = Arc::new(repo);
            let service = IngestService::new(repo.clone(), vec!["csv".to_string()]);
            (repo, service)
        }

        const FIVE_ROWS: &str = "name,description,price,category_id\n\
            Novel,paperback,12.50,1\n\
            Atlas,,30,1\n\
            Ghost,,5,9\n\
            Chess,wooden,45.00,2\n\
            Go,,25,2\n";

        #[test]
        fn test_bad_row_is_skipped_and_reported() {
            let (repo, service) = service(store());
            let result = service
                .ingest(&records(FIVE_ROWS), &IngestOptions::default())
                .unwrap();

            assert_eq!(result.success_count, 4);
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors[0].row, 3);
            assert_eq!(result.errors[0].to_string(), "row 3: category 9 does not exist");
            assert_eq!(result.product_ids.len(), 4);
            assert!(result.batch_id.starts_with("ingest_"));
            assert_eq!(repo.list_products(CategoryFilter::All).unwrap().len(), 4);
        }

        #[test]
        fn test_missing_column_rejects_batch() {
            let (repo, service) = service(store());
            let err = service
                .ingest(
                    &records("name,category_id\nNovel,1\n"),
                    &IngestOptions::default(),
                )
                .unwrap_err();

            assert!(matches!(err, Error::Schema(_)));
            assert!(repo.list_products(CategoryFilter::All).unwrap().is_empty());
        }

        #[test]
        fn test_reingest_duplicates_products() {
            let (repo, service) = service(store());
            let input = records("name,price,category_id\nA,1,1\nB,2,1\nC,3,1\nD,4,2\nE,5,2\n");

            service.ingest(&input, &IngestOptions::default()).unwrap();
            service.ingest(&input, &IngestOptions::default()).unwrap();

            assert_eq!(repo.list_products(CategoryFilter::All).unwrap().len(), 10);
        }

        #[test]
        fn test_preview_creates_nothing() {
            let (repo, service) = service(store());
            let result = service
                .ingest(&records(FIVE_ROWS), &IngestOptions { preview: true })
                .unwrap();

            assert!(result.preview);
            assert_eq!(result.success_count, 4);
            assert!(result.product_ids.is_empty());
            assert!(repo.list_products(CategoryFilter::All).unwrap().is_empty());
        }

        #[test]
        fn test_commit_failure_persists_nothing() {
            let failing = Arc::new(FailingCatalog(store()));
            let service = IngestService::new(failing.clone(), vec!["csv".to_string()]);

            let err = service
                .ingest(&records(FIVE_ROWS), &IngestOptions::default())
                .unwrap_err();

            assert!(matches!(err, Error::Commit(_)));
            assert!(failing.list_products(CategoryFilter::All).unwrap().is_empty());
        }

        #[test]
        fn test_row_messages() {
            let (_repo, service) = service(store());
            let input = records(
                "name,price,category_id\n\
                 A,1,x\n\
                 ,1,1\n\
                 B,abc,1\n\
                 C,-2,1\n",
            );
            let result = service.ingest(&input, &IngestOptions::default()).unwrap();

            let messages: Vec<String> = result.errors.iter().map(|e| e.to_string()).collect();
            assert_eq!(
                messages,
                vec![
                    "row 1: invalid category_id 'x'",
                    "row 2: name is required",
                    "row 3: invalid price 'abc'",
                    "row 4: price must be non-negative, got -2",
                ]
            );
            assert_eq!(result.success_count, 0);
        }

        #[test]
        fn test_price_outside_money_column_is_row_error() {
            let (repo, service) = service(store());
            let input = records(
                "name,price,category_id\n\
                 A,1,1\n\
                 B,2,1\n\
                 C,1e20,1\n\
                 D,4,1\n",
            );
            let result = service.ingest(&input, &IngestOptions::default()).unwrap();

            assert_eq!(result.success_count, 3);
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors[0].row, 3);
            assert!(result.errors[0].message.starts_with("price out of range"));
            assert_eq!(repo.list_products(CategoryFilter::All).unwrap().len(), 3);
        }

        #[test]
        fn test_sub_cent_price_is_rejected_not_rounded() {
            let (repo, service) = service(store());
            let input = records("name,price,category_id\nA,12.345,1\nB,12.340,1\n");
            let result = service.ingest(&input, &IngestOptions::default()).unwrap();

            assert_eq!(
                result.errors[0].to_string(),
                "row 1: price must have at most 2 decimal places, got 12.345"
            );
            assert_eq!(result.success_count, 1);
            let stored = repo.get_product(result.product_ids[0]).unwrap().unwrap();
            assert_eq!(stored.name, "B");
            assert_eq!(stored.price, Decimal::new(1234, 2));
        }

        #[test]
        fn test_description_defaults_to_empty() {
            let (repo, service) = service(store());
            let result = service
                .ingest(
                    &records("name,price,category_id\nNovel,9.99,1\n"),
                    &IngestOptions::default(),
                )
                .unwrap();

            let product = repo.get_product(result.product_ids[0]).unwrap().unwrap();
            assert_eq!(product.description, "");
            assert_eq!(product.price, Decimal::new(999, 2));
        }

        #[test]
        fn test_ingest_file_checks_extension() {
            let (_repo, service) = service(store());
            let dir = tempfile::tempdir().unwrap();

            let txt = dir.path().join("products.txt");
            std::fs::write(&txt, "name,price,category_id\nA,1,1\n").unwrap();
            let err = service.ingest_file(&txt, &IngestOptions::default()).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));

            let csv = dir.path().join("products.CSV");
            std::fs::write(&csv, "name,price,category_id\nA,1,1\n").unwrap();
            let result = service.ingest_file(&csv, &IngestOptions::default()).unwrap();
            assert_eq!(result.success_count, 1);
        }
    }

    #[test]
    fn test_row_error_display() {
        let err = RowError {
            row: 3,
            message: "category 9 does not exist".to_string(),
        };
        assert_eq!(err.to_string(), "row 3: category 9 does not exist");
    }
}
