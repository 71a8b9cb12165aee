//! Compiler errors

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A requested metric is not defined on the source
    MetricNotFound { source: String, metric: String },
    /// A groupby column is not defined on the source
    ColumnNotFound { source: String, column: String },
    /// The renderer does not match the source's backend
    BackendMismatch { source: String, expected: &'static str },
    /// The filter's form cannot be rendered for the source's backend
    UnsupportedFilter { source: String },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::MetricNotFound { source, metric } => {
                write!(f, "Metric '{}' not found on source '{}'", metric, source)
            }
            CompileError::ColumnNotFound { source, column } => {
                write!(f, "Column '{}' not found on source '{}'", column, source)
            }
            CompileError::BackendMismatch { source, expected } => {
                write!(f, "Source '{}' is not a {} source", source, expected)
            }
            CompileError::UnsupportedFilter { source } => {
                write!(f, "Filter form not supported by the backend of source '{}'", source)
            }
        }
    }
}

impl std::error::Error for CompileError {}
