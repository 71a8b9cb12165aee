//! Data type and metric type definitions for the catalog

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Column data types as reported by a schema source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Variable-length string (STRING, VARCHAR, TEXT, CHAR)
    String,
    /// 64-bit integer (LONG, BIGINT, INT, INTEGER)
    Long,
    /// 64-bit floating point
    Double,
    /// 32-bit floating point
    Float,
    /// Anything else, kept verbatim
    Other(String),
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Other(String::new())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::String => write!(f, "STRING"),
            DataType::Long => write!(f, "LONG"),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl FromStr for DataType {
    type Err = Infallible;

    /// Parsing never fails: unknown types become `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // VARCHAR(255) -> VARCHAR
        let base = match trimmed.find('(') {
            Some(idx) => &trimmed[..idx],
            None => trimmed,
        };

        Ok(match base.trim().to_uppercase().as_str() {
            "STRING" | "VARCHAR" | "TEXT" | "CHAR" => DataType::String,
            "LONG" | "BIGINT" | "INT" | "INTEGER" => DataType::Long,
            "DOUBLE" => DataType::Double,
            "FLOAT" => DataType::Float,
            _ => DataType::Other(trimmed.to_string()),
        })
    }
}

impl DataType {
    /// Parse a type string reported by an external schema source
    pub fn parse(s: &str) -> Self {
        match s.parse() {
            Ok(dt) => dt,
            Err(never) => match never {},
        }
    }

    /// Numeric types honor the sum/min/max capability flags
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Long | DataType::Double | DataType::Float)
    }

    /// Check if this is a string type (assumed to be a dimension)
    pub fn is_string(&self) -> bool {
        matches!(self, DataType::String)
    }

    /// Aggregator family prefix for numeric types.
    ///
    /// DOUBLE and FLOAT both use the double family.
    pub fn aggregator_family(&self) -> Option<&'static str> {
        match self {
            DataType::Long => Some("long"),
            DataType::Double | DataType::Float => Some("double"),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(DataType::parse(&s))
    }
}

impl Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// ============================================================================
// MetricType
// ============================================================================

/// Kind of aggregate a metric computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    Count,
    Sum,
    Min,
    Max,
    CountDistinct,
    /// Operator-declared expression
    Custom,
}

impl Default for MetricType {
    fn default() -> Self {
        MetricType::Custom
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricType::Count => write!(f, "count"),
            MetricType::Sum => write!(f, "sum"),
            MetricType::Min => write!(f, "min"),
            MetricType::Max => write!(f, "max"),
            MetricType::CountDistinct => write!(f, "count_distinct"),
            MetricType::Custom => write!(f, "custom"),
        }
    }
}

/// Error when parsing a metric type string
#[derive(Debug, Clone)]
pub struct ParseMetricTypeError {
    pub input: String,
}

impl fmt::Display for ParseMetricTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown metric type '{}'. Valid options: count, sum, min, max, count_distinct, custom",
            self.input
        )
    }
}

impl std::error::Error for ParseMetricTypeError {}

impl FromStr for MetricType {
    type Err = ParseMetricTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(MetricType::Count),
            "sum" => Ok(MetricType::Sum),
            "min" => Ok(MetricType::Min),
            "max" => Ok(MetricType::Max),
            "count_distinct" | "countdistinct" => Ok(MetricType::CountDistinct),
            "custom" => Ok(MetricType::Custom),
            _ => Err(ParseMetricTypeError { input: s.to_string() }),
        }
    }
}

impl<'de> Deserialize<'de> for MetricType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MetricType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for MetricType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
