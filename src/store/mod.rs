//! Catalog persistence seam
//!
//! All catalog mutation goes through an explicit [`CatalogTransaction`]
//! opened from a [`CatalogStore`]. A transaction dropped without
//! [`CatalogTransaction::commit`] discards everything it staged.
//!
//! Metric names are unique per source at the store level:
//! [`CatalogTransaction::insert_metric`] never overwrites and reports whether
//! a row was written.

mod error;
mod memory;
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::catalog::{Backend, Catalog, Column, Metric, Source};

/// A transactional record store holding the catalog
pub trait CatalogStore {
    /// Open a transaction scope
    fn begin(&mut self) -> Result<Box<dyn CatalogTransaction + '_>, StoreError>;
}

/// Reads and writes within one transaction scope
pub trait CatalogTransaction {
    /// Load a source with all of its columns and metrics
    fn get_source(&self, name: &str) -> Result<Option<Source>, StoreError>;

    /// Names of all stored sources, sorted
    fn source_names(&self) -> Result<Vec<String>, StoreError>;

    /// Create the source or re-point it to `backend`. Returns true if created.
    ///
    /// Re-pointing is limited to a backend of the same kind; anything else is
    /// [`StoreError::BackendConflict`].
    fn upsert_source(&mut self, name: &str, backend: &Backend) -> Result<bool, StoreError>;

    fn get_column(&self, source: &str, column: &str) -> Result<Option<Column>, StoreError>;

    /// Insert or replace the column keyed by `(source, column.name)`
    fn put_column(&mut self, source: &str, column: &Column) -> Result<(), StoreError>;

    fn get_metric(&self, source: &str, metric: &str) -> Result<Option<Metric>, StoreError>;

    /// Insert unless `(source, metric.metric_name)` already exists.
    /// Returns true if the metric was written.
    fn insert_metric(&mut self, source: &str, metric: &Metric) -> Result<bool, StoreError>;

    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Reject moving `source` from `existing` to a backend of another kind
pub(crate) fn check_backend_kind(
    source: &str,
    existing: &Backend,
    requested: &Backend,
) -> Result<(), StoreError> {
    if existing.kind() == requested.kind() {
        Ok(())
    } else {
        Err(StoreError::BackendConflict {
            source: source.to_string(),
            existing: existing.kind(),
            requested: requested.kind(),
        })
    }
}

/// Seed a store with every source declared in a catalog.
///
/// Existing metrics are kept; declared columns replace stored ones.
pub fn import_catalog(store: &mut dyn CatalogStore, catalog: &Catalog) -> Result<(), StoreError> {
    let mut tx = store.begin()?;
    for source in &catalog.sources {
        tx.upsert_source(&source.name, &source.backend)?;
        for column in &source.columns {
            tx.put_column(&source.name, column)?;
        }
        for metric in &source.metrics {
            tx.insert_metric(&source.name, metric)?;
        }
    }
    tx.commit()?;
    tracing::debug!(sources = catalog.sources.len(), "Imported catalog into store");
    Ok(())
}

/// Read a source in a short transaction of its own
pub fn load_source(store: &mut dyn CatalogStore, name: &str) -> Result<Option<Source>, StoreError> {
    let tx = store.begin()?;
    let source = tx.get_source(name)?;
    Ok(source)
}
