//! Aggregation renderer
//!
//! Renders an [`AbstractQuery`] into the structured aggregation spec an OLAP
//! broker accepts. The spec serializes to JSON with the keys `datasource`,
//! `dimensions`, `aggregations`, `granularity`, `intervals` and, only when
//! supplied, `filter` and `limit_spec`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use crate::catalog::{Backend, Source};
use crate::query::{AbstractQuery, Filter, Granularity};
use super::error::CompileError;
use super::resolve::{check_groupby, resolve_metrics};

/// Granularity in the form the broker protocol expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GranularitySpec {
    /// Named granularity passed through, e.g. `"all"` or `"day"`
    Named(String),
    /// `{"type": "duration", "duration": <ms>}`
    Duration {
        #[serde(rename = "type")]
        kind: String,
        duration: u64,
    },
}

impl GranularitySpec {
    pub fn duration(ms: u64) -> Self {
        GranularitySpec::Duration {
            kind: "duration".to_string(),
            duration: ms,
        }
    }
}

impl From<&Granularity> for GranularitySpec {
    fn from(granularity: &Granularity) -> Self {
        match granularity {
            Granularity::Named(name) => GranularitySpec::Named(name.clone()),
            Granularity::Duration(ms) => GranularitySpec::duration(*ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationSpec {
    pub datasource: String,
    pub dimensions: Vec<String>,
    /// Metric name → stored aggregator
    pub aggregations: BTreeMap<String, Value>,
    pub granularity: GranularitySpec,
    /// `from/to` in ISO-8601
    pub intervals: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_spec: Option<Value>,
}

impl AggregationSpec {
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Compile a query against an OLAP source into an aggregation spec.
///
/// A referenced metric whose stored expression is not a readable aggregator
/// is left out with a warning instead of failing the whole query.
pub fn compile_aggregation(
    source: &Source,
    query: &AbstractQuery,
) -> Result<AggregationSpec, CompileError> {
    if source.backend.is_relational() {
        return Err(CompileError::BackendMismatch {
            source: source.name.clone(),
            expected: "olap",
        });
    }

    let filter = match &query.filter {
        None => None,
        Some(Filter::Structured(value)) => Some(value.clone()),
        Some(Filter::Sql(_)) => {
            return Err(CompileError::UnsupportedFilter {
                source: source.name.clone(),
            })
        }
    };

    check_groupby(source, query)?;

    let mut aggregations = BTreeMap::new();
    for metric in resolve_metrics(source, query)? {
        match metric.aggregator() {
            Ok(aggregator) => {
                aggregations.insert(metric.metric_name.clone(), aggregator);
            }
            Err(e) => {
                tracing::warn!(source = %source.name, error = %e, "Skipping metric");
            }
        }
    }

    let spec = AggregationSpec {
        datasource: source.name.clone(),
        dimensions: query.groupby.clone(),
        aggregations,
        granularity: GranularitySpec::from(&query.granularity),
        intervals: query.time_range.iso_interval(),
        filter,
        limit_spec: query.limit_spec.clone(),
    };

    tracing::debug!(source = %source.name, spec = %spec.to_json(), "Compiled aggregation spec");
    Ok(spec)
}
