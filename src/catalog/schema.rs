//! Root catalog definition

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use super::source::{Backend, Source};
use crate::error::ParseError;

/// A relational connection descriptor. The URI is opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    pub uri: Option<String>,
}

/// An OLAP cluster descriptor. Endpoints are opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub coordinator: Option<String>,
    pub broker: Option<String>,
}

/// The root catalog: backends and the sources that live on them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub databases: Vec<Database>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Catalog {
    /// Load and validate a catalog from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        crate::parser::parse_file(path)
    }

    pub fn get_source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn get_database(&self, name: &str) -> Option<&Database> {
        self.databases.iter().find(|d| d.name == name)
    }

    pub fn get_cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// Sources living on the given cluster, in declaration order
    pub fn cluster_sources(&self, cluster: &str) -> Vec<&Source> {
        self.sources
            .iter()
            .filter(|s| matches!(&s.backend, Backend::Olap { cluster: c } if c == cluster))
            .collect()
    }

    /// Check referential integrity and name uniqueness
    pub fn validate(&self) -> Result<(), ParseError> {
        let mut source_names = HashSet::new();
        for source in &self.sources {
            if !source_names.insert(source.name.as_str()) {
                return Err(ParseError::Invalid(format!(
                    "duplicate source '{}'",
                    source.name
                )));
            }

            match &source.backend {
                Backend::Relational { database, .. } if self.get_database(database).is_none() => {
                    return Err(ParseError::Invalid(format!(
                        "source '{}' references unknown database '{}'",
                        source.name, database
                    )));
                }
                Backend::Olap { cluster } if self.get_cluster(cluster).is_none() => {
                    return Err(ParseError::Invalid(format!(
                        "source '{}' references unknown cluster '{}'",
                        source.name, cluster
                    )));
                }
                _ => {}
            }

            let mut columns = HashSet::new();
            for column in &source.columns {
                if !columns.insert(column.name.as_str()) {
                    return Err(ParseError::Invalid(format!(
                        "duplicate column '{}' in source '{}'",
                        column.name, source.name
                    )));
                }
            }

            let mut metrics = HashSet::new();
            for metric in &source.metrics {
                if !metrics.insert(metric.metric_name.as_str()) {
                    return Err(ParseError::Invalid(format!(
                        "duplicate metric '{}' in source '{}'",
                        metric.metric_name, source.name
                    )));
                }
            }
        }
        Ok(())
    }
}
