//! Metric derivation from column capability flags
//!
//! Rules, applied independently per column:
//! - `sum` on a numeric column → `sum__<col>`
//! - `min` on a numeric column → `min__<col>`
//! - `max` on a numeric column → `max__<col>`
//! - `count_distinct` on any column → `count_distinct__<col>`
//!
//! Plus one `count` metric per source. Expressions are rendered in the
//! backend form of the owning source: SQL text for relational sources,
//! aggregator JSON for OLAP sources.

use crate::catalog::{Aggregator, Backend, Column, Metric, MetricType};
use crate::ident::quote_identifier;
use crate::store::{load_source, CatalogStore, CatalogTransaction, StoreError};
use super::error::DeriveError;

pub const COUNT_METRIC: &str = "count";

/// The source-level `count` metric
pub fn count_metric(backend: &Backend) -> Metric {
    let expression = if backend.is_relational() {
        "COUNT(*)".to_string()
    } else {
        Aggregator::Count { name: COUNT_METRIC.to_string() }.to_json()
    };
    Metric::new(COUNT_METRIC, "COUNT(*)", MetricType::Count, expression)
}

/// Metrics implied by one column's flags and type. Never includes `count`.
pub fn derive_metrics(column: &Column, backend: &Backend) -> Vec<Metric> {
    let mut metrics = Vec::new();

    // sum/min/max are inert on non-numeric columns
    if let Some(family) = column.data_type.aggregator_family() {
        let numeric_rules = [
            (column.sum, MetricType::Sum, "sum", "SUM"),
            (column.min, MetricType::Min, "min", "MIN"),
            (column.max, MetricType::Max, "max", "MAX"),
        ];
        for (enabled, metric_type, prefix, sql_func) in numeric_rules {
            if !enabled {
                continue;
            }
            let name = format!("{}__{}", prefix, column.name);
            let expression = if backend.is_relational() {
                format!("{}({})", sql_func, quote_identifier(&column.name))
            } else {
                match Aggregator::numeric(family, metric_type, name.as_str(), column.name.as_str()) {
                    Some(agg) => agg.to_json(),
                    None => continue,
                }
            };
            metrics.push(Metric::new(
                name,
                format!("{}({})", sql_func, column.name),
                metric_type,
                expression,
            ));
        }
    }

    if column.count_distinct {
        let name = format!("count_distinct__{}", column.name);
        let expression = if backend.is_relational() {
            format!("COUNT(DISTINCT {})", quote_identifier(&column.name))
        } else {
            Aggregator::Cardinality {
                name: name.clone(),
                field_names: vec![column.name.clone()],
            }
            .to_json()
        };
        metrics.push(Metric::new(
            name,
            format!("COUNT(DISTINCT {})", column.name),
            MetricType::CountDistinct,
            expression,
        ));
    }

    metrics
}

/// Insert the source-level `count` metric unless one already exists.
/// Returns true if it was written.
pub fn ensure_count_metric(
    tx: &mut dyn CatalogTransaction,
    source: &str,
    backend: &Backend,
) -> Result<bool, StoreError> {
    if tx.get_metric(source, COUNT_METRIC)?.is_some() {
        return Ok(false);
    }
    tx.insert_metric(source, &count_metric(backend))
}

/// Insert the metrics derived from one column, skipping names the source
/// already has. Hand-edited metrics are never overwritten.
///
/// Returns the names of the metrics written.
pub fn generate_metrics(
    tx: &mut dyn CatalogTransaction,
    source: &str,
    backend: &Backend,
    column: &Column,
) -> Result<Vec<String>, StoreError> {
    let mut added = Vec::new();
    for metric in derive_metrics(column, backend) {
        if tx.get_metric(source, &metric.metric_name)?.is_some() {
            continue;
        }
        // The store's uniqueness check covers a concurrent insert between lookup and write
        if tx.insert_metric(source, &metric)? {
            added.push(metric.metric_name);
        }
    }

    if !added.is_empty() {
        tracing::debug!(source = %source, column = %column.name, metrics = ?added, "Derived metrics");
    }
    Ok(added)
}

/// Regenerate metrics for every column of a stored source.
///
/// The `count` metric is written once for the source; each column is then
/// committed as its own unit.
pub fn generate_source_metrics(
    store: &mut dyn CatalogStore,
    source_name: &str,
) -> Result<Vec<String>, DeriveError> {
    let source = load_source(store, source_name)?
        .ok_or_else(|| DeriveError::SourceNotFound(source_name.to_string()))?;

    let mut added = Vec::new();

    let mut tx = store.begin()?;
    if ensure_count_metric(tx.as_mut(), &source.name, &source.backend)? {
        added.push(COUNT_METRIC.to_string());
    }
    tx.commit()?;

    for column in &source.columns {
        let mut tx = store.begin()?;
        added.extend(generate_metrics(tx.as_mut(), &source.name, &source.backend, column)?);
        tx.commit()?;
    }

    tracing::info!(source = %source.name, added = added.len(), "Generated source metrics");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, DataType, Source};
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    fn names(metrics: &[Metric]) -> Vec<&str> {
        metrics.iter().map(|m| m.metric_name.as_str()).collect()
    }

    fn aggregator(metric: &Metric) -> Value {
        serde_json::from_str(&metric.expression).unwrap()
    }

    #[test]
    fn test_all_flags_on_numeric_column() {
        let col = Column::new("c", DataType::Long)
            .with_sum()
            .with_min()
            .with_max()
            .with_count_distinct();
        let metrics = derive_metrics(&col, &Backend::olap("druid"));
        assert_eq!(names(&metrics), vec!["sum__c", "min__c", "max__c", "count_distinct__c"]);
        assert_eq!(
            aggregator(&metrics[0]),
            json!({"type": "longSum", "name": "sum__c", "fieldName": "c"})
        );
        assert_eq!(metrics[1].verbose_name, "MIN(c)");
        assert_eq!(metrics[3].verbose_name, "COUNT(DISTINCT c)");
        assert_eq!(metrics[3].metric_type, MetricType::CountDistinct);
    }

    #[test]
    fn test_float_narrows_to_double_family() {
        let col = Column::new("price", DataType::Float).with_sum().with_max();
        let metrics = derive_metrics(&col, &Backend::olap("druid"));
        assert_eq!(aggregator(&metrics[0])["type"], "doubleSum");
        assert_eq!(aggregator(&metrics[1])["type"], "doubleMax");
    }

    #[test]
    fn test_string_column_ignores_numeric_flags() {
        let col = Column::new("country", DataType::String).with_sum().with_min().with_max();
        assert!(derive_metrics(&col, &Backend::olap("druid")).is_empty());

        let col = col.with_count_distinct();
        let metrics = derive_metrics(&col, &Backend::olap("druid"));
        assert_eq!(names(&metrics), vec!["count_distinct__country"]);
        assert_eq!(
            aggregator(&metrics[0]),
            json!({"type": "cardinality", "name": "count_distinct__country", "fieldNames": ["country"]})
        );
    }

    #[test]
    fn test_relational_expressions_are_sql() {
        let col = Column::new("revenue", DataType::Double).with_sum().with_count_distinct();
        let metrics = derive_metrics(&col, &Backend::relational("warehouse"));
        assert_eq!(metrics[0].expression, "SUM(revenue)");
        assert_eq!(metrics[1].expression, "COUNT(DISTINCT revenue)");
        assert_eq!(count_metric(&Backend::relational("warehouse")).expression, "COUNT(*)");
    }

    #[test]
    fn test_relational_expression_escapes_column() {
        let col = Column::new("gross amount", DataType::Double).with_sum();
        let metrics = derive_metrics(&col, &Backend::relational("warehouse"));
        assert_eq!(metrics[0].metric_name, "sum__gross amount");
        assert_eq!(metrics[0].expression, "SUM(\"gross amount\")");
    }

    #[test]
    fn test_olap_count_metric() {
        let count = count_metric(&Backend::olap("druid"));
        assert_eq!(count.verbose_name, "COUNT(*)");
        assert_eq!(aggregator(&count), json!({"type": "count", "name": "count"}));
    }

    #[test]
    fn test_generate_metrics_is_idempotent() {
        let mut store = MemoryStore::new();
        let backend = Backend::olap("druid");
        let col = Column::new("amount", DataType::Double).with_sum().with_min();

        let mut tx = store.begin().unwrap();
        tx.upsert_source("events", &backend).unwrap();
        let first = generate_metrics(tx.as_mut(), "events", &backend, &col).unwrap();
        let second = generate_metrics(tx.as_mut(), "events", &backend, &col).unwrap();
        tx.commit().unwrap();

        assert_eq!(first, vec!["sum__amount", "min__amount"]);
        assert!(second.is_empty());
        assert_eq!(store.source("events").unwrap().metrics.len(), 2);
    }

    #[test]
    fn test_generate_metrics_keeps_hand_edited_expression() {
        let mut store = MemoryStore::new();
        let backend = Backend::olap("druid");
        let col = Column::new("amount", DataType::Double).with_sum();
        let edited = Metric::new("sum__amount", "Revenue", MetricType::Sum, r#"{"type":"doubleSum","name":"sum__amount","fieldName":"net"}"#);

        let mut tx = store.begin().unwrap();
        tx.upsert_source("events", &backend).unwrap();
        tx.insert_metric("events", &edited).unwrap();
        assert!(generate_metrics(tx.as_mut(), "events", &backend, &col).unwrap().is_empty());
        tx.commit().unwrap();

        assert_eq!(store.source("events").unwrap().get_metric("sum__amount"), Some(&edited));
    }

    #[test]
    fn test_generate_source_metrics_counts_once() {
        let source = Source::new("events", Backend::olap("druid"))
            .with_column(Column::new("a", DataType::Long).with_sum())
            .with_column(Column::new("b", DataType::Long).with_max());
        let mut store = MemoryStore::from_catalog(&Catalog {
            sources: vec![source],
            ..Default::default()
        });

        let added = generate_source_metrics(&mut store, "events").unwrap();
        assert_eq!(added, vec!["count", "sum__a", "max__b"]);

        let again = generate_source_metrics(&mut store, "events").unwrap();
        assert!(again.is_empty());

        let metrics = &store.source("events").unwrap().metrics;
        assert_eq!(metrics.iter().filter(|m| m.metric_name == "count").count(), 1);
    }

    #[test]
    fn test_generate_source_metrics_unknown_source() {
        let mut store = MemoryStore::new();
        let err = generate_source_metrics(&mut store, "ghost").unwrap_err();
        assert!(matches!(err, DeriveError::SourceNotFound(_)));
    }
}
