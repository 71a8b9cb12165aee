//! Name resolution shared by both renderers

use crate::catalog::{Metric, Source};
use crate::query::AbstractQuery;
use super::error::CompileError;

/// Check every groupby column exists on the source
pub(crate) fn check_groupby(source: &Source, query: &AbstractQuery) -> Result<(), CompileError> {
    for column in &query.groupby {
        if source.get_column(column).is_none() {
            return Err(CompileError::ColumnNotFound {
                source: source.name.clone(),
                column: column.clone(),
            });
        }
    }
    Ok(())
}

/// Resolve requested metric names, in request order.
///
/// Unknown names are a compile error.
pub(crate) fn resolve_metrics<'a>(
    source: &'a Source,
    query: &AbstractQuery,
) -> Result<Vec<&'a Metric>, CompileError> {
    query
        .metrics
        .iter()
        .map(|name| {
            source.get_metric(name).ok_or_else(|| CompileError::MetricNotFound {
                source: source.name.clone(),
                metric: name.clone(),
            })
        })
        .collect()
}
