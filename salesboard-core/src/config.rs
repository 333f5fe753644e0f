//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "databaseFile": "salesboard.duckdb" },
//!   "seed": { "directory": "seed", "autoLoad": false },
//!   "ingest": { "allowedExtensions": ["csv"] }
//! }
//! ```
//! Missing keys take their defaults, and a malformed file is ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_DATABASE_FILE: &str = "salesboard.duckdb";
pub const DEFAULT_SEED_DIR: &str = "seed";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    seed: SeedSettings,
    #[serde(default)]
    ingest: IngestSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    database_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedSettings {
    #[serde(default)]
    directory: Option<PathBuf>,
    #[serde(default)]
    auto_load: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestSettings {
    #[serde(default)]
    allowed_extensions: Vec<String>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sales database path
    pub database_path: PathBuf,
    /// Directory holding categories.csv, products.csv and sales.csv
    pub seed_dir: PathBuf,
    /// Run the bootstrap when the context opens
    pub auto_seed: bool,
    /// File extensions accepted by `IngestService::ingest_file`
    pub allowed_extensions: Vec<String>,
}

impl Config {
    /// Defaults for a data directory, ignoring settings and environment
    pub fn defaults(data_dir: &Path) -> Self {
        Self {
            database_path: data_dir.join(DEFAULT_DATABASE_FILE),
            seed_dir: data_dir.join(DEFAULT_SEED_DIR),
            auto_seed: false,
            allowed_extensions: vec!["csv".to_string()],
        }
    }

    /// Load config from the data directory
    ///
    /// Environment overrides (for CI/testing):
    /// - `SALESBOARD_SEED_DIR` replaces `seed.directory`
    /// - `SALESBOARD_AUTO_SEED` replaces `seed.autoLoad`
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        Self::resolve(
            data_dir,
            raw,
            std::env::var("SALESBOARD_SEED_DIR").ok(),
            std::env::var("SALESBOARD_AUTO_SEED").ok(),
        )
    }

    fn resolve(
        data_dir: &Path,
        raw: SettingsFile,
        seed_dir_env: Option<String>,
        auto_seed_env: Option<String>,
    ) -> Result<Self> {
        let mut config = Self::defaults(data_dir);

        if let Some(file) = raw.app.database_file {
            let file = file.trim();
            if file.is_empty() {
                return Err(Error::Config("app.databaseFile must not be empty".to_string()));
            }
            config.database_path = data_dir.join(file);
        }

        // Relative seed directories are taken from the data directory
        if let Some(dir) = seed_dir_env.map(PathBuf::from).or(raw.seed.directory) {
            config.seed_dir = data_dir.join(dir);
        }

        config.auto_seed = match auto_seed_env.as_deref().map(str::trim) {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.seed.auto_load,
        };

        let extensions: Vec<String> = raw
            .ingest
            .allowed_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if !extensions.is_empty() {
            config.allowed_extensions = extensions;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SettingsFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults_without_settings() {
        let dir = Path::new("/data");
        let config = Config::resolve(dir, SettingsFile::default(), None, None).unwrap();
        assert_eq!(config, Config::defaults(dir));
        assert_eq!(config.database_path, dir.join("salesboard.duckdb"));
        assert_eq!(config.allowed_extensions, vec!["csv"]);
    }

    #[test]
    fn test_settings_are_applied() {
        let raw = parse(
            r#"{
                "app": { "databaseFile": "shop.duckdb" },
                "seed": { "directory": "/srv/seed", "autoLoad": true },
                "ingest": { "allowedExtensions": [".CSV", "tsv"] }
            }"#,
        );
        let config = Config::resolve(Path::new("/data"), raw, None, None).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/data/shop.duckdb"));
        assert_eq!(config.seed_dir, PathBuf::from("/srv/seed"));
        assert!(config.auto_seed);
        assert_eq!(config.allowed_extensions, vec!["csv", "tsv"]);
    }

    #[test]
    fn test_env_overrides_settings() {
        let raw = parse(r#"{ "seed": { "directory": "a", "autoLoad": true } }"#);
        let config = Config::resolve(
            Path::new("/data"),
            raw,
            Some("b".to_string()),
            Some("0".to_string()),
        )
        .unwrap();
        assert_eq!(config.seed_dir, PathBuf::from("/data/b"));
        assert!(!config.auto_seed);
    }

    #[test]
    fn test_unrecognized_env_value_keeps_setting() {
        let raw = parse(r#"{ "seed": { "autoLoad": true } }"#);
        let config =
            Config::resolve(Path::new("/data"), raw, None, Some("maybe".to_string())).unwrap();
        assert!(config.auto_seed);
    }

    #[test]
    fn test_blank_database_file_is_config_error() {
        let raw = parse(r#"{ "app": { "databaseFile": "  " } }"#);
        let err = Config::resolve(Path::new("/data"), raw, None, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.database_path, dir.path().join(DEFAULT_DATABASE_FILE));
    }
}
