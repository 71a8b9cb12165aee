//! Catalog reconciliation against an external schema snapshot
//!
//! Reconciliation is additive: unseen columns are created, known columns get
//! their type refreshed, and columns missing from the snapshot are left as
//! they are. Operator-set flags are never reset. Every column is committed
//! as its own unit together with the metrics it implies.

use crate::catalog::{Backend, Column, Source};
use crate::deriver::{ensure_count_metric, generate_metrics, COUNT_METRIC};
use crate::store::{load_source, CatalogStore, StoreError};
use super::error::ReconcileError;
use super::olap::{OlapMetadataClient, TimeBoundaryProbe};
use super::snapshot::{SchemaFetcher, SchemaSnapshot};

/// What a reconciliation did to a source
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// No metadata was available; the source was left unchanged
    Unavailable,
    Applied(ReconcileReport),
}

impl ReconcileOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReconcileOutcome::Applied(_))
    }

    pub fn report(&self) -> Option<&ReconcileReport> {
        match self {
            ReconcileOutcome::Applied(report) => Some(report),
            ReconcileOutcome::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    /// The source as committed after reconciliation
    pub source: Source,
    pub columns_added: Vec<String>,
    /// Existing columns whose type changed
    pub columns_updated: Vec<String>,
    pub metrics_added: Vec<String>,
}

/// Reconcile a stored source against a snapshot.
///
/// An empty snapshot is a no-op.
pub fn reconcile(
    store: &mut dyn CatalogStore,
    source_name: &str,
    snapshot: &SchemaSnapshot,
) -> Result<ReconcileOutcome, ReconcileError> {
    if snapshot.is_empty() {
        tracing::debug!(source = %source_name, "Empty schema snapshot; nothing to reconcile");
        return Ok(ReconcileOutcome::Unavailable);
    }

    let source = load_source(store, source_name)?
        .ok_or_else(|| ReconcileError::SourceNotFound(source_name.to_string()))?;
    let backend = &source.backend;

    let mut columns_added = Vec::new();
    let mut columns_updated = Vec::new();
    let mut metrics_added = Vec::new();

    let mut tx = store.begin()?;
    if ensure_count_metric(tx.as_mut(), source_name, backend)? {
        metrics_added.push(COUNT_METRIC.to_string());
    }
    tx.commit()?;

    for (name, descriptor) in snapshot.iter() {
        let data_type = descriptor.parsed_type();
        let mut tx = store.begin()?;

        let column = match tx.get_column(source_name, name)? {
            None => {
                let column = Column::discovered(name.as_str(), data_type);
                tx.put_column(source_name, &column)?;
                columns_added.push(name.clone());
                column
            }
            Some(mut column) => {
                if column.data_type != data_type {
                    tracing::debug!(
                        source = %source_name,
                        column = %name,
                        from = %column.data_type,
                        to = %data_type,
                        "Column type changed"
                    );
                    column.data_type = data_type;
                    tx.put_column(source_name, &column)?;
                    columns_updated.push(name.clone());
                }
                column
            }
        };

        metrics_added.extend(generate_metrics(tx.as_mut(), source_name, backend, &column)?);
        tx.commit()?;
    }

    let source = load_source(store, source_name)?
        .ok_or_else(|| ReconcileError::SourceNotFound(source_name.to_string()))?;

    tracing::info!(
        source = %source_name,
        columns_added = columns_added.len(),
        columns_updated = columns_updated.len(),
        metrics_added = metrics_added.len(),
        "Reconciled source"
    );

    Ok(ReconcileOutcome::Applied(ReconcileReport {
        source,
        columns_added,
        columns_updated,
        metrics_added,
    }))
}

/// Ensure a source record exists for `name` on `backend`, fetch its schema
/// and reconcile.
///
/// A failing fetch is logged and reported as `Unavailable`; only store
/// failures are errors.
pub fn sync_source(
    store: &mut dyn CatalogStore,
    name: &str,
    backend: &Backend,
    fetcher: &dyn SchemaFetcher,
) -> Result<ReconcileOutcome, ReconcileError> {
    let mut tx = store.begin()?;
    if tx.upsert_source(name, backend)? {
        tracing::info!(source = %name, backend = backend.kind(), "Registered source");
    }
    tx.commit()?;

    let source = load_source(store, name)?
        .ok_or_else(|| ReconcileError::SourceNotFound(name.to_string()))?;

    let snapshot = match fetcher.fetch_schema(&source) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(source = %name, error = %e, "Schema fetch failed; skipping reconciliation");
            return Ok(ReconcileOutcome::Unavailable);
        }
    };

    reconcile(store, name, &snapshot)
}

/// Sync every datasource hosted by an OLAP cluster.
///
/// Returns one outcome per datasource, in the order the cluster lists them.
/// An unreachable cluster yields no outcomes. A datasource whose name is
/// already taken by a relational source is skipped and left out.
pub fn refresh_cluster<C>(
    store: &mut dyn CatalogStore,
    cluster: &str,
    client: &C,
) -> Result<Vec<(String, ReconcileOutcome)>, ReconcileError>
where
    C: OlapMetadataClient + ?Sized,
{
    let datasources = match client.list_datasources() {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(cluster = %cluster, error = %e, "Could not list datasources");
            return Ok(Vec::new());
        }
    };

    let backend = Backend::olap(cluster);
    let probe = TimeBoundaryProbe::new(client);
    let mut outcomes = Vec::with_capacity(datasources.len());
    for datasource in datasources {
        match sync_source(store, &datasource, &backend, &probe) {
            Ok(outcome) => outcomes.push((datasource, outcome)),
            Err(ReconcileError::Store(StoreError::BackendConflict { existing, .. })) => {
                tracing::warn!(
                    cluster = %cluster,
                    datasource = %datasource,
                    existing = existing,
                    "Name belongs to a source on another backend; skipping"
                );
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        cluster = %cluster,
        datasources = outcomes.len(),
        applied = outcomes.iter().filter(|(_, o)| o.is_applied()).count(),
        "Refreshed cluster"
    );
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, DataType};
    use crate::reconciler::FetchError;
    use crate::store::MemoryStore;

    fn store_with(source: Source) -> MemoryStore {
        MemoryStore::from_catalog(&Catalog {
            sources: vec![source],
            ..Default::default()
        })
    }

    fn applied(outcome: ReconcileOutcome) -> ReconcileReport {
        match outcome {
            ReconcileOutcome::Applied(report) => report,
            ReconcileOutcome::Unavailable => panic!("expected an applied reconciliation"),
        }
    }

    #[test]
    fn test_new_string_column_is_dimensional() {
        let mut store = store_with(Source::new("events", Backend::olap("druid")));
        let snapshot = SchemaSnapshot::new()
            .with_column("country", "STRING")
            .with_column("added", "LONG");

        let report = applied(reconcile(&mut store, "events", &snapshot).unwrap());
        assert_eq!(report.columns_added, vec!["added", "country"]);
        assert_eq!(report.metrics_added, vec!["count"]);

        let country = report.source.get_column("country").unwrap();
        assert!(country.is_groupby && country.is_filterable);
        let added = report.source.get_column("added").unwrap();
        assert!(!added.is_groupby && !added.is_filterable);
        assert_eq!(added.data_type, DataType::Long);
    }

    #[test]
    fn test_type_change_keeps_flags_and_derives() {
        let source = Source::new("events", Backend::olap("druid"))
            .with_column(Column::new("amount", DataType::String).with_sum().with_groupby());
        let mut store = store_with(source);
        let snapshot = SchemaSnapshot::new().with_column("amount", "DOUBLE");

        let report = applied(reconcile(&mut store, "events", &snapshot).unwrap());
        assert_eq!(report.columns_updated, vec!["amount"]);
        assert_eq!(report.metrics_added, vec!["count", "sum__amount"]);

        let amount = report.source.get_column("amount").unwrap();
        assert_eq!(amount.data_type, DataType::Double);
        assert!(amount.sum && amount.is_groupby);
    }

    #[test]
    fn test_reconcile_twice_is_stable() {
        let mut store = store_with(Source::new("events", Backend::olap("druid")));
        let snapshot = SchemaSnapshot::new().with_column("country", "STRING");

        reconcile(&mut store, "events", &snapshot).unwrap();
        let second = applied(reconcile(&mut store, "events", &snapshot).unwrap());
        assert!(second.columns_added.is_empty());
        assert!(second.columns_updated.is_empty());
        assert!(second.metrics_added.is_empty());
        assert_eq!(second.source.columns.len(), 1);
        assert_eq!(second.source.metrics.len(), 1);
    }

    #[test]
    fn test_missing_columns_are_untouched() {
        let source = Source::new("events", Backend::olap("druid"))
            .with_column(Column::new("legacy", DataType::Long));
        let mut store = store_with(source);
        let snapshot = SchemaSnapshot::new().with_column("country", "STRING");

        let report = applied(reconcile(&mut store, "events", &snapshot).unwrap());
        let legacy = report.source.get_column("legacy").unwrap();
        assert!(legacy.is_active);
    }

    #[test]
    fn test_empty_snapshot_is_noop() {
        let source = Source::new("events", Backend::olap("druid"))
            .with_column(Column::new("a", DataType::Long));
        let mut store = store_with(source.clone());

        let outcome = reconcile(&mut store, "events", &SchemaSnapshot::new()).unwrap();
        assert_eq!(outcome, ReconcileOutcome::Unavailable);
        assert_eq!(store.source("events"), Some(&source));
    }

    #[test]
    fn test_unknown_source() {
        let mut store = MemoryStore::new();
        let snapshot = SchemaSnapshot::new().with_column("a", "LONG");
        let err = reconcile(&mut store, "ghost", &snapshot).unwrap_err();
        assert!(matches!(err, ReconcileError::SourceNotFound(name) if name == "ghost"));
    }

    struct Failing;

    impl SchemaFetcher for Failing {
        fn fetch_schema(&self, _source: &Source) -> Result<SchemaSnapshot, FetchError> {
            Err(FetchError::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn test_sync_source_refuses_backend_kind_change() {
        let mut store = store_with(Source::new("orders", Backend::relational("warehouse")));
        let fetcher = Failing;
        let err = sync_source(&mut store, "orders", &Backend::olap("druid"), &fetcher).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Store(StoreError::BackendConflict { existing: "relational", .. })
        ));
        assert!(store.source("orders").unwrap().backend.is_relational());
    }

    #[test]
    fn test_sync_source_tolerates_fetch_failure() {
        let mut store = MemoryStore::new();
        let outcome = sync_source(&mut store, "orders", &Backend::relational("warehouse"), &Failing).unwrap();
        assert_eq!(outcome, ReconcileOutcome::Unavailable);

        let source = store.source("orders").unwrap();
        assert!(source.columns.is_empty());
        assert!(source.metrics.is_empty());
    }
}
