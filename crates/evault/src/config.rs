//! Configuration management for evault.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "evault";

/// Default local document database file name.
const DATABASE_FILE_NAME: &str = "documents.db";

/// Public Firestore REST endpoint.
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `EVAULT_`, `__` between section and key)
/// 2. TOML config file at `~/.config/evault/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which collection to read and from where.
    pub source: SourceConfig,
    /// Remote Firestore connection.
    pub firestore: FirestoreConfig,
    /// Local `SQLite` document database.
    pub sqlite: SqliteConfig,
    /// Presentation settings.
    pub view: ViewConfig,
}

/// Kind of document database to read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Cloud Firestore over its REST API.
    #[default]
    Firestore,
    /// A local `SQLite` document database.
    Sqlite,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Firestore => write!(f, "firestore"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Source selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Which backend to use.
    pub kind: SourceKind,
    /// Name of the collection holding the case documents.
    pub collection: String,
    /// Upper bound for the initial fetch, in seconds.
    pub timeout_secs: u64,
}

/// Firestore connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Database id within the project.
    pub database_id: String,
    /// Web API key, appended as the `key` query parameter when set.
    pub api_key: Option<String>,
    /// REST endpoint, overridable for the emulator.
    pub base_url: String,
    /// Documents requested per page while reading a collection.
    pub page_size: u32,
}

/// Local document database settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/evault/documents.db`
    pub database_path: Option<PathBuf>,
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Number of card columns in the grid.
    pub columns: usize,
    /// Thumbnail image shown on every card.
    pub thumbnail: String,
    /// Prompt shown by the interactive search.
    pub search_placeholder: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Firestore,
            collection: "tests".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database_id: "(default)".to_string(),
            api_key: None,
            base_url: DEFAULT_FIRESTORE_URL.to_string(),
            page_size: 300,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            thumbnail: "/pdf.png".to_string(),
            search_placeholder: "Search Tests".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = Self::resolve_path(config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("EVAULT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration file in effect: `config_path` if given, else the
    /// default location.
    #[must_use]
    pub fn resolve_path(config_path: Option<PathBuf>) -> PathBuf {
        config_path.unwrap_or_else(Self::default_config_path)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// Connection details of a backend are checked when that backend is built,
    /// so a default configuration is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.source.collection.trim().is_empty() {
            return Err(Error::config("source.collection cannot be empty"));
        }

        if self.source.timeout_secs == 0 {
            return Err(Error::config("source.timeout_secs must be greater than 0"));
        }

        if self.firestore.page_size == 0 {
            return Err(Error::config("firestore.page_size must be greater than 0"));
        }

        if self.view.columns == 0 {
            return Err(Error::config("view.columns must be greater than 0"));
        }

        Ok(())
    }

    /// Get the local database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.sqlite
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// A copy safe to display, with secrets masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(key) = config.firestore.api_key.as_mut() {
            *key = "********".to_string();
        }
        config
    }

    /// Get the fetch timeout as a Duration.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.source.kind, SourceKind::Firestore);
        assert_eq!(config.source.collection, "tests");
        assert_eq!(config.firestore.database_id, "(default)");
        assert_eq!(config.firestore.base_url, DEFAULT_FIRESTORE_URL);
        assert!(config.firestore.api_key.is_none());
        assert_eq!(config.view.columns, 2);
        assert_eq!(config.view.thumbnail, "/pdf.png");
        assert_eq!(config.view.search_placeholder, "Search Tests");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_collection() {
        let mut config = Config::default();
        config.source.collection = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("source.collection"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.source.timeout_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_secs"));
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = Config::default();
        config.firestore.page_size = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("page_size"));
    }

    #[test]
    fn test_validate_zero_columns() {
        let mut config = Config::default();
        config.view.columns = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("view.columns"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("documents.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.sqlite.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_fetch_timeout() {
        assert_eq!(Config::default().fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("evault"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_resolve_path_prefers_explicit_file() {
        let custom = PathBuf::from("/custom/evault.toml");
        assert_eq!(Config::resolve_path(Some(custom.clone())), custom);
        assert_eq!(Config::resolve_path(None), Config::default_config_path());
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("evault_config_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[source]
kind = "sqlite"
collection = "cases"

[view]
columns = 3
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.source.kind, SourceKind::Sqlite);
        assert_eq!(config.source.collection, "cases");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.view.columns, 3);
        assert_eq!(config.view.thumbnail, "/pdf.png");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "evault_invalid_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[view]\ncolumns = 0\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Firestore.to_string(), "firestore");
        assert_eq!(SourceKind::Sqlite.to_string(), "sqlite");
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"collection\":\"tests\""));
        assert!(json.contains("\"kind\":\"firestore\""));
    }

    #[test]
    fn test_source_config_deserialize() {
        let json = r#"{"kind": "sqlite", "timeout_secs": 5}"#;
        let source: SourceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(source.kind, SourceKind::Sqlite);
        assert_eq!(source.timeout_secs, 5);
        assert_eq!(source.collection, "tests");
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let mut config = Config::default();
        assert_eq!(config.redacted(), config);

        config.firestore.api_key = Some("AIza-secret".to_string());
        let shown = config.redacted();
        assert_eq!(shown.firestore.api_key.as_deref(), Some("********"));
        assert_eq!(shown.source, config.source);
    }
}
