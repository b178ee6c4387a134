//! `SQLite` schema of the local document database.

/// Tables and indexes of schema version 1.
///
/// `data` holds the JSON object of one document; `position` fixes the order
/// in which a collection is read back.
pub const SCHEMA_V1: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    doc_id TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (collection, doc_id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, position);
";
