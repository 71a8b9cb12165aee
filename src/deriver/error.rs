//! Derivation errors

use std::fmt;
use crate::store::StoreError;

#[derive(Debug)]
pub enum DeriveError {
    /// The source to derive metrics for is not in the store
    SourceNotFound(String),
    Store(StoreError),
}

impl fmt::Display for DeriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeriveError::SourceNotFound(name) => write!(f, "Source '{}' not found", name),
            DeriveError::Store(e) => write!(f, "Metric derivation failed: {}", e),
        }
    }
}

impl std::error::Error for DeriveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeriveError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for DeriveError {
    fn from(err: StoreError) -> Self {
        DeriveError::Store(err)
    }
}
