//! External schema snapshots and the capability that produces them

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use crate::catalog::{DataType, Source};
use super::error::FetchError;

/// Per-column metadata reported by the external schema.
///
/// Only `type` is interpreted; everything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColumnDescriptor {
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            extra: Map::new(),
        }
    }

    pub fn parsed_type(&self) -> DataType {
        DataType::parse(&self.data_type)
    }
}

/// Column name → descriptor, as observed at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaSnapshot(BTreeMap<String, ColumnDescriptor>);

impl SchemaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.0.insert(name.into(), ColumnDescriptor::new(data_type));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: ColumnDescriptor) {
        self.0.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Columns in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnDescriptor)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, ColumnDescriptor)> for SchemaSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, ColumnDescriptor)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Capability that reads the authoritative schema of a source: relational
/// introspection or an OLAP segment-metadata probe.
///
/// May return an empty snapshot when no metadata is available yet.
pub trait SchemaFetcher {
    fn fetch_schema(&self, source: &Source) -> Result<SchemaSnapshot, FetchError>;
}
