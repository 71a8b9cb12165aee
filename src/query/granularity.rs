//! Time bucketing and time ranges

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use super::error::QueryError;

/// Time-bucketing unit of a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Granularity {
    /// Bare duration in milliseconds
    Duration(u64),
    /// Named granularity; "all" disables bucketing
    Named(String),
}

impl Granularity {
    pub const ALL: &'static str = "all";

    pub fn all() -> Self {
        Granularity::Named(Self::ALL.to_string())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Granularity::Named(name.into())
    }

    pub fn duration_ms(ms: u64) -> Self {
        Granularity::Duration(ms)
    }

    /// True for the "all" sentinel (no time bucketing)
    pub fn is_all(&self) -> bool {
        matches!(self, Granularity::Named(name) if name.eq_ignore_ascii_case(Self::ALL))
    }

    pub(crate) fn validate(&self) -> Result<(), QueryError> {
        match self {
            Granularity::Duration(0) => Err(QueryError::InvalidGranularity("0".to_string())),
            Granularity::Named(name) if name.trim().is_empty() => {
                Err(QueryError::InvalidGranularity(name.clone()))
            }
            _ => Ok(()),
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::all()
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Duration(ms) => write!(f, "{}ms", ms),
            Granularity::Named(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for Granularity {
    type Err = QueryError;

    /// Digits parse as a millisecond duration, anything else as a name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let granularity = match s.parse::<u64>() {
            Ok(ms) => Granularity::Duration(ms),
            Err(_) => Granularity::Named(s.to_string()),
        };
        granularity.validate()?;
        Ok(granularity)
    }
}

/// Half-open interval `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl TimeRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self, QueryError> {
        if from >= to {
            return Err(QueryError::EmptyTimeRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.from && ts < self.to
    }

    /// ISO-8601 interval string, `from/to`
    pub fn iso_interval(&self) -> String {
        format!("{}/{}", isoformat(&self.from), isoformat(&self.to))
    }
}

/// ISO-8601 without offset; fractional seconds only when non-zero
pub fn isoformat(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
