//! Relational renderer
//!
//! Renders an [`AbstractQuery`] into SQL text for a relational source.
//! Identifiers are escaped; time bounds are emitted as ISO-8601 literals.
//! Stored metric expressions are trusted SQL and emitted verbatim.

use crate::catalog::{Backend, Source};
use crate::ident::{quote_identifier, quote_qualified};
use crate::query::{isoformat, AbstractQuery, Filter};
use super::error::CompileError;
use super::resolve::{check_groupby, resolve_metrics};

/// Alias of the time bucket column when granularity is not "all"
pub const TIMESTAMP_ALIAS: &str = "timestamp";

/// Compile a query against a relational source into SQL text
pub fn compile_sql(source: &Source, query: &AbstractQuery) -> Result<String, CompileError> {
    let time_column = match &source.backend {
        Backend::Relational { time_column, .. } => quote_identifier(time_column),
        Backend::Olap { .. } => {
            return Err(CompileError::BackendMismatch {
                source: source.name.clone(),
                expected: "relational",
            })
        }
    };

    let predicate = match &query.filter {
        None => None,
        Some(Filter::Sql(text)) if text.trim().is_empty() => None,
        Some(Filter::Sql(text)) => Some(text.as_str()),
        Some(Filter::Structured(_)) => {
            return Err(CompileError::UnsupportedFilter {
                source: source.name.clone(),
            })
        }
    };

    check_groupby(source, query)?;
    let metrics = resolve_metrics(source, query)?;

    let mut group_cols: Vec<String> = query.groupby.iter().map(|c| quote_identifier(c)).collect();
    let mut select_items = group_cols.clone();

    for metric in metrics {
        if metric.expression.trim().is_empty() {
            tracing::warn!(source = %source.name, metric = %metric.metric_name, "Skipping metric with empty expression");
            continue;
        }
        select_items.push(format!(
            "{} AS {}",
            metric.expression,
            quote_identifier(&metric.metric_name)
        ));
    }

    if !query.granularity.is_all() {
        select_items.push(format!("{} AS {}", time_column, quote_identifier(TIMESTAMP_ALIAS)));
        group_cols.push(time_column.clone());
    }

    let select = if select_items.is_empty() {
        "*".to_string()
    } else {
        select_items.join(", ")
    };

    let mut where_clause = format!(
        "{tc} >= '{from}' AND {tc} < '{to}'",
        tc = time_column,
        from = isoformat(&query.from()),
        to = isoformat(&query.to()),
    );
    if let Some(predicate) = predicate {
        where_clause.push_str(&format!(" AND ({})", predicate));
    }

    let mut sql = format!(
        "SELECT {select}\nFROM {table}\nWHERE {where_clause}",
        table = quote_qualified(&source.name),
    );
    if !group_cols.is_empty() {
        sql.push_str(&format!("\nGROUP BY {}", group_cols.join(", ")));
    }
    if let Some(limit) = query.row_limit {
        sql.push_str(&format!("\nLIMIT {}", limit));
    }

    tracing::debug!(source = %source.name, sql = %sql, "Compiled SQL query");
    Ok(sql)
}
