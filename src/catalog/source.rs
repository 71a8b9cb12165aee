//! Queryable sources (relational tables and OLAP datasources)

use serde::{Deserialize, Serialize};
use super::column::Column;
use super::metric::Metric;

fn default_time_column() -> String {
    "ds".to_string()
}

/// The single backend a source belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A table reached through a relational connection
    Relational {
        database: String,
        /// Column the time range and time bucket apply to
        #[serde(default = "default_time_column")]
        time_column: String,
    },
    /// A datasource on an OLAP cluster
    Olap { cluster: String },
}

impl Backend {
    pub fn relational(database: impl Into<String>) -> Self {
        Backend::Relational {
            database: database.into(),
            time_column: default_time_column(),
        }
    }

    pub fn olap(cluster: impl Into<String>) -> Self {
        Backend::Olap { cluster: cluster.into() }
    }

    pub fn is_relational(&self) -> bool {
        matches!(self, Backend::Relational { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Backend::Relational { .. } => "relational",
            Backend::Olap { .. } => "olap",
        }
    }
}

/// A queryable entity owning columns and metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    /// Written as a nested map, e.g. `backend: {olap: {cluster: druid}}`
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub backend: Backend,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

impl Source {
    pub fn new(name: impl Into<String>, backend: Backend) -> Self {
        Self {
            name: name.into(),
            backend,
            columns: Vec::new(),
            metrics: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn get_metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.metric_name == name)
    }

    // Views below are computed on every call; sources hold tens of columns.

    /// All column names, sorted
    pub fn column_names(&self) -> Vec<&str> {
        sorted_names(self.columns.iter())
    }

    /// Names of columns usable as dimensions, sorted
    pub fn groupby_column_names(&self) -> Vec<&str> {
        sorted_names(self.columns.iter().filter(|c| c.is_groupby))
    }

    /// Names of columns usable in filters, sorted
    pub fn filterable_column_names(&self) -> Vec<&str> {
        sorted_names(self.columns.iter().filter(|c| c.is_filterable))
    }

    /// (metric_name, verbose_name) pairs sorted by verbose name
    pub fn metrics_combo(&self) -> Vec<(&str, &str)> {
        let mut combo: Vec<(&str, &str)> = self
            .metrics
            .iter()
            .map(|m| (m.metric_name.as_str(), m.verbose_name.as_str()))
            .collect();
        combo.sort_by(|a, b| a.1.cmp(b.1));
        combo
    }
}

fn sorted_names<'a>(columns: impl Iterator<Item = &'a Column>) -> Vec<&'a str> {
    let mut names: Vec<&str> = columns.map(|c| c.name.as_str()).collect();
    names.sort();
    names
}
