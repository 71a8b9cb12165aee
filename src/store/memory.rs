//! In-memory catalog store

use std::collections::BTreeMap;
use crate::catalog::{Backend, Catalog, Column, Metric, Source};
use super::error::StoreError;
use super::{check_backend_kind, CatalogStore, CatalogTransaction};

/// Catalog store kept in process memory.
///
/// Transactions stage their writes on a copy of the catalog and swap it in
/// on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sources: BTreeMap<String, Source>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the sources of a catalog
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let sources = catalog
            .sources
            .iter()
            .map(|s| (s.name.clone(), s.clone()))
            .collect();
        Self { sources }
    }

    /// Committed state of a source
    pub fn source(&self, name: &str) -> Option<&Source> {
        self.sources.get(name)
    }
}

impl CatalogStore for MemoryStore {
    fn begin(&mut self) -> Result<Box<dyn CatalogTransaction + '_>, StoreError> {
        let staged = self.sources.clone();
        Ok(Box::new(MemoryTransaction { store: self, staged }))
    }
}

struct MemoryTransaction<'a> {
    store: &'a mut MemoryStore,
    staged: BTreeMap<String, Source>,
}

impl MemoryTransaction<'_> {
    fn source_mut(&mut self, name: &str) -> Result<&mut Source, StoreError> {
        self.staged
            .get_mut(name)
            .ok_or_else(|| StoreError::SourceNotFound(name.to_string()))
    }
}

impl CatalogTransaction for MemoryTransaction<'_> {
    fn get_source(&self, name: &str) -> Result<Option<Source>, StoreError> {
        Ok(self.staged.get(name).cloned())
    }

    fn source_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.staged.keys().cloned().collect())
    }

    fn upsert_source(&mut self, name: &str, backend: &Backend) -> Result<bool, StoreError> {
        match self.staged.get_mut(name) {
            Some(source) => {
                check_backend_kind(name, &source.backend, backend)?;
                source.backend = backend.clone();
                Ok(false)
            }
            None => {
                self.staged
                    .insert(name.to_string(), Source::new(name, backend.clone()));
                Ok(true)
            }
        }
    }

    fn get_column(&self, source: &str, column: &str) -> Result<Option<Column>, StoreError> {
        Ok(self
            .staged
            .get(source)
            .and_then(|s| s.get_column(column))
            .cloned())
    }

    fn put_column(&mut self, source: &str, column: &Column) -> Result<(), StoreError> {
        let source = self.source_mut(source)?;
        match source.get_column_mut(&column.name) {
            Some(existing) => *existing = column.clone(),
            None => source.columns.push(column.clone()),
        }
        Ok(())
    }

    fn get_metric(&self, source: &str, metric: &str) -> Result<Option<Metric>, StoreError> {
        Ok(self
            .staged
            .get(source)
            .and_then(|s| s.get_metric(metric))
            .cloned())
    }

    fn insert_metric(&mut self, source: &str, metric: &Metric) -> Result<bool, StoreError> {
        let source = self.source_mut(source)?;
        if source.get_metric(&metric.metric_name).is_some() {
            return Ok(false);
        }
        source.metrics.push(metric.clone());
        Ok(true)
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTransaction { store, staged } = *self;
        store.sources = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DataType, MetricType};

    #[test]
    fn test_commit_publishes_writes() {
        let mut store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        assert!(tx.upsert_source("events", &Backend::olap("druid")).unwrap());
        tx.put_column("events", &Column::new("country", DataType::String)).unwrap();
        tx.commit().unwrap();

        let source = store.source("events").unwrap();
        assert_eq!(source.column_names(), vec!["country"]);
    }

    #[test]
    fn test_dropped_transaction_discards_writes() {
        let mut store = MemoryStore::new();
        {
            let mut tx = store.begin().unwrap();
            tx.upsert_source("events", &Backend::olap("druid")).unwrap();
        }
        assert!(store.source("events").is_none());
    }

    #[test]
    fn test_insert_metric_never_overwrites() {
        let mut store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        tx.upsert_source("events", &Backend::olap("druid")).unwrap();
        let edited = Metric::new("count", "Rows", MetricType::Count, r#"{"type":"count","name":"rows"}"#);
        assert!(tx.insert_metric("events", &edited).unwrap());

        let derived = Metric::new("count", "COUNT(*)", MetricType::Count, r#"{"type":"count","name":"count"}"#);
        assert!(!tx.insert_metric("events", &derived).unwrap());
        assert_eq!(tx.get_metric("events", "count").unwrap().unwrap().verbose_name, "Rows");
    }

    #[test]
    fn test_write_to_unknown_source() {
        let mut store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        let err = tx.put_column("ghost", &Column::new("a", DataType::Long)).unwrap_err();
        assert!(matches!(err, StoreError::SourceNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_upsert_source_rejects_kind_change() {
        let mut store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        tx.upsert_source("orders", &Backend::relational("warehouse")).unwrap();
        let err = tx.upsert_source("orders", &Backend::olap("druid")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::BackendConflict { existing: "relational", requested: "olap", .. }
        ));
        assert_eq!(
            tx.get_source("orders").unwrap().unwrap().backend,
            Backend::relational("warehouse")
        );
    }

    #[test]
    fn test_upsert_source_repoints_backend() {
        let mut store = MemoryStore::new();
        let mut tx = store.begin().unwrap();
        tx.upsert_source("events", &Backend::olap("a")).unwrap();
        assert!(!tx.upsert_source("events", &Backend::olap("b")).unwrap());
        assert_eq!(tx.get_source("events").unwrap().unwrap().backend, Backend::olap("b"));
    }
}
