//! Local `SQLite` document database.
//!
//! Documents are stored as JSON text keyed by collection and document id,
//! in the order they were imported. `evault import` fills a collection from a
//! JSON file; the viewer itself only reads.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{DocumentSource, RawDocument};
use crate::error::{Error, Result};

/// Reads collections from a local `SQLite` database.
#[derive(Debug)]
pub struct SqliteSource {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection, shared with blocking read tasks.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSource {
    /// Open or create a document database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening document database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Document database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a database that must already exist.
    ///
    /// Reading never creates a database, so a missing file is reported
    /// instead of showing up as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseMissing`] if there is no file at `path`, or
    /// any error of [`open`](Self::open).
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::DatabaseMissing {
                path: path.to_path_buf(),
            });
        }
        Self::open(path)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count the documents of a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self, collection: &str) -> Result<i64> {
        let count: i64 = lock(&self.conn)?.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            [collection],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Store documents in a collection, after the ones already there.
    ///
    /// A document whose id already exists has its data replaced and keeps its
    /// place. With `replace`, the collection is emptied first. Runs in one
    /// transaction and returns the number of documents written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails; nothing is written
    /// in that case.
    pub fn import(
        &self,
        collection: &str,
        documents: &[RawDocument],
        replace: bool,
    ) -> Result<usize> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        if replace {
            let removed = tx.execute("DELETE FROM documents WHERE collection = ?1", [collection])?;
            debug!(collection, removed, "Cleared collection before import");
        }

        let next_position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM documents WHERE collection = ?1",
            [collection],
            |row| row.get(0),
        )?;

        {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO documents (collection, doc_id, position, data)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT (collection, doc_id) DO UPDATE SET data = excluded.data
                ",
            )?;
            for (position, doc) in (next_position..).zip(documents) {
                stmt.execute(params![collection, doc.id, position, doc.data.to_string()])?;
            }
        }

        tx.commit()?;
        info!(collection, documents = documents.len(), "Imported documents");
        Ok(documents.len())
    }
}

/// Turn the contents of an import file into documents.
///
/// An array yields one document per element, with ids starting at
/// `first_id`. An object is read as a map from document id to document.
///
/// # Errors
///
/// Returns [`Error::Decode`] for any other JSON value.
pub fn documents_from_json(value: Value, first_id: usize) -> Result<Vec<RawDocument>> {
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, data)| RawDocument::new((first_id + i).to_string(), data))
            .collect()),
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(id, data)| RawDocument::new(id, data))
            .collect()),
        other => Err(Error::decode(format!(
            "import file must hold an array or an object of documents, found {other}"
        ))),
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| Error::internal("document database lock poisoned"))
}

/// Read a collection in stored order.
///
/// Rows whose `data` is not valid JSON are skipped with a warning.
fn read_collection(conn: &Mutex<Connection>, collection: &str) -> Result<Vec<RawDocument>> {
    let conn = lock(conn)?;
    let mut stmt = conn.prepare(
        r"
        SELECT doc_id, data FROM documents
        WHERE collection = ?1
        ORDER BY position ASC, rowid ASC
        ",
    )?;

    let rows = stmt
        .query_map([collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut documents = Vec::with_capacity(rows.len());
    for (id, data) in rows {
        match serde_json::from_str(&data) {
            Ok(value) => documents.push(RawDocument::new(id, value)),
            Err(e) => warn!(collection, doc_id = %id, error = %e, "Skipping unreadable document"),
        }
    }
    Ok(documents)
}

#[async_trait::async_trait]
impl DocumentSource for SqliteSource {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn location(&self) -> String {
        format!("sqlite database {}", self.path.display())
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>> {
        let conn = Arc::clone(&self.conn);
        let name = collection.to_string();
        // Off the runtime, so the loader's timeout still applies
        let documents = tokio::task::spawn_blocking(move || read_collection(&conn, &name))
            .await
            .map_err(|e| Error::internal(format!("database read task failed: {e}")))??;
        debug!(collection, documents = documents.len(), "Read local collection");
        Ok(documents)
    }
}
