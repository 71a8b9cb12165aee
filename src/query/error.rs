//! Query construction errors

use chrono::NaiveDateTime;
use std::fmt;

/// Errors raised when building an AbstractQuery
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// `from` is not strictly before `to`
    EmptyTimeRange {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    /// timeseries_limit must be positive
    InvalidTimeseriesLimit(u32),
    /// row_limit must be positive when set
    InvalidRowLimit(u64),
    /// Blank named granularity or a zero duration
    InvalidGranularity(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::EmptyTimeRange { from, to } => {
                write!(f, "Time range [{}, {}) is empty", from, to)
            }
            QueryError::InvalidTimeseriesLimit(n) => {
                write!(f, "Invalid timeseries limit {}: must be at least 1", n)
            }
            QueryError::InvalidRowLimit(n) => {
                write!(f, "Invalid row limit {}: must be at least 1", n)
            }
            QueryError::InvalidGranularity(g) => {
                write!(f, "Invalid granularity '{}'", g)
            }
        }
    }
}

impl std::error::Error for QueryError {}
