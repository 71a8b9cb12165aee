//! Reconciler errors

use std::fmt;
use crate::store::StoreError;

/// Failure signalled by an external schema collaborator.
///
/// Always treated as transient: reconciliation turns it into a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The endpoint could not be reached or refused the request
    Unavailable(String),
    /// The endpoint answered with something unreadable
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Unavailable(msg) => write!(f, "Schema source unavailable: {}", msg),
            FetchError::Malformed(msg) => write!(f, "Malformed schema response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Errors that abort a reconciliation
#[derive(Debug)]
pub enum ReconcileError {
    /// The source to reconcile is not in the store
    SourceNotFound(String),
    Store(StoreError),
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::SourceNotFound(name) => write!(f, "Source '{}' not found", name),
            ReconcileError::Store(e) => write!(f, "Reconciliation failed: {}", e),
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ReconcileError {
    fn from(err: StoreError) -> Self {
        ReconcileError::Store(err)
    }
}
