//! Query execution seam
//!
//! Running compiled queries is the job of backend clients outside this
//! crate. They plug in through [`QueryExecutor`].

mod error;

pub use error::ExecuteError;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::catalog::Source;
use crate::compiler::{compile, AggregationSpec, CompiledQuery};
use crate::query::AbstractQuery;

static NULL: Value = Value::Null;

/// Row-oriented query result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub rows: Vec<Map<String, Value>>,
}

impl ResultSet {
    pub fn new(rows: Vec<Map<String, Value>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column across all rows, `Null` where absent
    pub fn column(&self, name: &str) -> Vec<&Value> {
        self.rows
            .iter()
            .map(|row| row.get(name).unwrap_or(&NULL))
            .collect()
    }
}

/// Execution capability for both backend forms
pub trait QueryExecutor {
    fn execute_sql(&self, source: &Source, sql: &str) -> Result<ResultSet, ExecuteError>;

    fn execute_aggregation(
        &self,
        source: &Source,
        spec: &AggregationSpec,
    ) -> Result<ResultSet, ExecuteError>;
}

/// Compile `query` for `source` and hand the result to `executor`
pub fn run_query<E>(
    source: &Source,
    query: &AbstractQuery,
    executor: &E,
) -> Result<ResultSet, ExecuteError>
where
    E: QueryExecutor + ?Sized,
{
    let compiled = compile(source, query)?;
    let result = match &compiled {
        CompiledQuery::Sql(sql) => executor.execute_sql(source, sql),
        CompiledQuery::Aggregation(spec) => executor.execute_aggregation(source, spec),
    };

    match &result {
        Ok(rows) => tracing::debug!(source = %source.name, rows = rows.len(), "Query executed"),
        Err(e) => tracing::warn!(source = %source.name, error = %e, "Query execution failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_fills_missing_with_null() {
        let rows = vec![
            json!({"region": "EMEA", "count": 3}),
            json!({"count": 1}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();
        let result = ResultSet::new(rows);
        assert_eq!(result.column("region"), vec![&json!("EMEA"), &Value::Null]);
    }
}
