//! Schema versioning for the local document database.
//!
//! The version is kept in `PRAGMA user_version`; 0 marks a fresh file.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::SCHEMA_V1;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Create the schema of a fresh database, or check an existing one.
///
/// A database written by a newer release is refused rather than read with
/// the wrong layout.
///
/// # Errors
///
/// Returns an error if schema creation fails or the database version is not
/// one this build understands.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    match schema_version(conn)? {
        0 => {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(SCHEMA_V1)?;
            tx.execute_batch(&format!("PRAGMA user_version = {CURRENT_VERSION}"))?;
            tx.commit()?;
            Ok(())
        }
        CURRENT_VERSION => Ok(()),
        version if version > CURRENT_VERSION => Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        }),
        version => Err(Error::DatabaseMigration {
            message: format!("unknown schema version: {version}"),
        }),
    }
}

fn schema_version(conn: &Connection) -> Result<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}
