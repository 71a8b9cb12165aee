//! Column definitions for queryable sources

use serde::{Deserialize, Serialize};
use super::types::DataType;

fn default_true() -> bool {
    true
}

/// One field of a source, with its capability flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    #[serde(default)]
    pub is_groupby: bool,
    #[serde(default)]
    pub is_filterable: bool,
    /// Capability flags. `sum`, `min` and `max` only take effect on numeric types.
    #[serde(default)]
    pub sum: bool,
    #[serde(default)]
    pub min: bool,
    #[serde(default)]
    pub max: bool,
    #[serde(default)]
    pub count_distinct: bool,
    /// Soft-delete marker; columns are never removed
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: DataType::default(),
            is_groupby: false,
            is_filterable: false,
            sum: false,
            min: false,
            max: false,
            count_distinct: false,
            is_active: true,
            description: None,
        }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            ..Default::default()
        }
    }

    /// Column first seen during reconciliation.
    ///
    /// String columns are assumed to be dimensions.
    pub fn discovered(name: impl Into<String>, data_type: DataType) -> Self {
        let dimensional = data_type.is_string();
        Self {
            is_groupby: dimensional,
            is_filterable: dimensional,
            ..Self::new(name, data_type)
        }
    }

    pub fn with_groupby(mut self) -> Self {
        self.is_groupby = true;
        self
    }

    pub fn with_filterable(mut self) -> Self {
        self.is_filterable = true;
        self
    }

    pub fn with_sum(mut self) -> Self {
        self.sum = true;
        self
    }

    pub fn with_min(mut self) -> Self {
        self.min = true;
        self
    }

    pub fn with_max(mut self) -> Self {
        self.max = true;
        self
    }

    pub fn with_count_distinct(mut self) -> Self {
        self.count_distinct = true;
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.data_type.is_numeric()
    }
}
