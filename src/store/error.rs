//! Store errors

use std::fmt;

/// Errors raised by a catalog store
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite failure
    Sqlite(rusqlite::Error),
    /// Column or metric written against a source that does not exist
    SourceNotFound(String),
    /// A stored value could not be encoded or decoded
    Serialization(String),
    /// A source cannot move between backend kinds
    BackendConflict {
        source: String,
        existing: &'static str,
        requested: &'static str,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "SQLite error: {}", e),
            StoreError::SourceNotFound(name) => write!(f, "Source '{}' not found", name),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::BackendConflict { source, existing, requested } => write!(
                f,
                "Source '{}' is a {} source and cannot be re-pointed to a {} backend",
                source, existing, requested
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Sqlite(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
