//! Metric types - named aggregates owned by a source

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use super::types::MetricType;

/// A named aggregate computation.
///
/// `expression` is opaque to the catalog: SQL text for relational sources,
/// JSON aggregator text for OLAP sources. It is stored as text and only
/// interpreted by the renderer that consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub metric_name: String,
    #[serde(default)]
    pub verbose_name: String,
    #[serde(default)]
    pub metric_type: MetricType,
    #[serde(deserialize_with = "expression_text")]
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Accept either raw text or a structured YAML/JSON object (stored as JSON text)
fn expression_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        other => serde_json::to_string(&other).map_err(serde::de::Error::custom),
    }
}

impl Metric {
    pub fn new(
        metric_name: impl Into<String>,
        verbose_name: impl Into<String>,
        metric_type: MetricType,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            verbose_name: verbose_name.into(),
            metric_type,
            expression: expression.into(),
            description: None,
        }
    }

    /// Parse the stored expression as a structured aggregator.
    ///
    /// The expression must be a JSON object carrying a string `type`.
    pub fn aggregator(&self) -> Result<Value, MalformedExpression> {
        let value: Value = serde_json::from_str(&self.expression).map_err(|e| MalformedExpression {
            metric: self.metric_name.clone(),
            reason: e.to_string(),
        })?;

        match value.get("type") {
            Some(Value::String(_)) => Ok(value),
            _ => Err(MalformedExpression {
                metric: self.metric_name.clone(),
                reason: "expected an object with a string 'type'".to_string(),
            }),
        }
    }
}

/// A stored metric expression that cannot be read as an aggregator
#[derive(Debug, Clone)]
pub struct MalformedExpression {
    pub metric: String,
    pub reason: String,
}

impl fmt::Display for MalformedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed expression for metric '{}': {}", self.metric, self.reason)
    }
}

impl std::error::Error for MalformedExpression {}

// ============================================================================
// Aggregator
// ============================================================================

/// Structured aggregator definitions produced by metric derivation.
///
/// Serialized with a `type` discriminator, e.g.
/// `{"type": "doubleSum", "name": "sum__x", "fieldName": "x"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Aggregator {
    #[serde(rename = "count")]
    Count { name: String },
    #[serde(rename = "longSum")]
    LongSum {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    #[serde(rename = "doubleSum")]
    DoubleSum {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    #[serde(rename = "longMin")]
    LongMin {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    #[serde(rename = "doubleMin")]
    DoubleMin {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    #[serde(rename = "longMax")]
    LongMax {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    #[serde(rename = "doubleMax")]
    DoubleMax {
        name: String,
        #[serde(rename = "fieldName")]
        field_name: String,
    },
    /// Distinct count over one or more fields
    #[serde(rename = "cardinality")]
    Cardinality {
        name: String,
        #[serde(rename = "fieldNames")]
        field_names: Vec<String>,
    },
}

impl Aggregator {
    /// Build a numeric aggregator for the given family ("long" or "double")
    /// and metric type. Returns None for non-numeric combinations.
    pub fn numeric(
        family: &str,
        metric_type: MetricType,
        name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Option<Self> {
        let name = name.into();
        let field_name = field_name.into();
        let agg = match (family, metric_type) {
            ("long", MetricType::Sum) => Aggregator::LongSum { name, field_name },
            ("double", MetricType::Sum) => Aggregator::DoubleSum { name, field_name },
            ("long", MetricType::Min) => Aggregator::LongMin { name, field_name },
            ("double", MetricType::Min) => Aggregator::DoubleMin { name, field_name },
            ("long", MetricType::Max) => Aggregator::LongMax { name, field_name },
            ("double", MetricType::Max) => Aggregator::DoubleMax { name, field_name },
            _ => return None,
        };
        Some(agg)
    }

    /// Serialize to the JSON text stored on a metric
    pub fn to_json(&self) -> String {
        // Enum of plain string fields; serialization is infallible
        serde_json::to_string(self).unwrap_or_default()
    }
}
