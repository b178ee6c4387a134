//! Error types for evault.
//!
//! This module defines all error types used throughout the evault crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for evault operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the local document database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// The local document database has not been created yet.
    #[error("no document database at {path}; run `evault import` to create it")]
    DatabaseMissing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to initialize or migrate the database schema.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Remote Errors ===
    /// The HTTP request to the remote document database failed.
    #[error("request to document database failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote document database answered with a non-success status.
    #[error("document database returned {status}: {body}")]
    RemoteStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// A document could not be decoded.
    #[error("failed to decode document: {message}")]
    Decode {
        /// Description of what could not be decoded.
        message: String,
    },

    /// An operation timed out.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    // === View Errors ===
    /// No loaded record carries the requested case id.
    #[error("no document with case id '{case_id}'")]
    RecordNotFound {
        /// The case id that was looked up.
        case_id: String,
    },

    /// The record has no document URL to open.
    #[error("document for case '{case_id}' has no link")]
    MissingLink {
        /// The case id of the record.
        case_id: String,
    },

    /// The system handler for a document link could not be launched.
    #[error("failed to open {url}: {source}")]
    LinkOpen {
        /// The URL that was being opened.
        url: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Rendering a template failed.
    #[error("render failed: {0}")]
    Render(#[from] minijinja::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for evault operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new configuration validation error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from talking to the remote database.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::RemoteStatus { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::RecordNotFound {
            case_id: "C-1".to_string(),
        };
        assert_eq!(err.to_string(), "no document with case id 'C-1'");

        let err = Error::decode("not an object");
        assert_eq!(err.to_string(), "failed to decode document: not an object");
    }

    #[test]
    fn test_database_missing_display() {
        let err = Error::DatabaseMissing {
            path: PathBuf::from("/tmp/documents.db"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/documents.db"));
        assert!(msg.contains("evault import"));
        assert!(!err.is_remote());
    }

    #[test]
    fn test_error_is_remote() {
        let err = Error::RemoteStatus {
            status: 403,
            body: "denied".to_string(),
        };
        assert!(err.is_remote());
        assert!(Error::Timeout {
            operation: "fetch".to_string()
        }
        .is_remote());
        assert!(!Error::internal("x").is_remote());
    }

    #[test]
    fn test_remote_status_display() {
        let err = Error::RemoteStatus {
            status: 404,
            body: "collection missing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("collection missing"));
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("columns must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: columns must be greater than 0"
        );
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_missing_link_display() {
        let err = Error::MissingLink {
            case_id: "C-9".to_string(),
        };
        assert!(err.to_string().contains("C-9"));
    }

    #[test]
    fn test_link_open_display() {
        let err = Error::LinkOpen {
            url: "https://example.com/a.pdf".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no handler"),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/a.pdf"));
        assert!(msg.contains("no handler"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_timeout_error_display() {
        let err = Error::Timeout {
            operation: "fetch collection 'tests'".to_string(),
        };
        assert!(err.to_string().contains("fetch collection 'tests'"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
