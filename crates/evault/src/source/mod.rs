//! Document database access.
//!
//! The view never reaches for a global database handle: it is handed an
//! implementation of [`DocumentSource`] and reads one collection through it.
//!
//! - [`FirestoreSource`] reads a Cloud Firestore collection over REST.
//! - [`SqliteSource`] reads a local `SQLite` document database.
//! - [`MemorySource`] serves documents from memory, for tests and embedding.

mod firestore;
mod memory;
pub mod sqlite;
mod value;

use std::sync::Arc;

use serde_json::Value;

use crate::config::{Config, SourceKind};
use crate::error::Result;

pub use firestore::FirestoreSource;
pub use memory::MemorySource;
pub use sqlite::SqliteSource;

/// A document as returned by a source, before it is decoded into a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Identifier of the document within its collection.
    pub id: String,
    /// Plain JSON content; normally an object of field values.
    pub data: Value,
}

impl RawDocument {
    /// Create a raw document.
    #[must_use]
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Read access to a document database.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync + std::fmt::Debug {
    /// Short name of this backend (for logging).
    fn name(&self) -> &'static str;

    /// Human-readable description of where documents come from.
    fn location(&self) -> String;

    /// Read every document of a collection, in the order the backend returns
    /// them.
    ///
    /// An unknown collection reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or answers with
    /// something that is not a document listing.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>>;
}

/// Build the source selected by the configuration.
///
/// # Errors
///
/// Returns an error if the selected backend is misconfigured or its database
/// cannot be opened.
pub fn from_config(config: &Config) -> Result<Arc<dyn DocumentSource>> {
    let source: Arc<dyn DocumentSource> = match config.source.kind {
        SourceKind::Firestore => Arc::new(FirestoreSource::new(&config.firestore)?),
        SourceKind::Sqlite => Arc::new(SqliteSource::open_existing(config.database_path())?),
    };
    tracing::debug!(source = source.name(), location = %source.location(), "Built document source");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_from_config_rejects_firestore_without_project() {
        let config = Config::default();
        let err = from_config(&config).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
        assert!(err.to_string().contains("project_id"));
    }

    #[test]
    fn test_from_config_firestore() {
        let mut config = Config::default();
        config.firestore.project_id = "e-vault-demo".to_string();

        let source = from_config(&config).unwrap();
        assert_eq!(source.name(), "firestore");
        assert!(source.location().contains("e-vault-demo"));
    }

    #[test]
    fn test_from_config_sqlite() {
        let path = std::env::temp_dir().join(format!(
            "evault_from_config_{}/documents.db",
            std::process::id()
        ));
        let mut config = Config::default();
        config.source.kind = SourceKind::Sqlite;
        config.sqlite.database_path = Some(path.clone());
        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        // Reading never creates the database
        let err = from_config(&config).unwrap_err();
        assert!(matches!(err, Error::DatabaseMissing { .. }));
        assert!(!path.exists());

        drop(SqliteSource::open(&path).unwrap());
        let source = from_config(&config).unwrap();
        assert_eq!(source.name(), "sqlite");
        assert!(source.location().contains("documents.db"));

        drop(source);
        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn test_raw_document_new() {
        let doc = RawDocument::new("abc", serde_json::json!({ "caseName": "X" }));
        assert_eq!(doc.id, "abc");
        assert!(doc.data.is_object());
    }
}
