//! Query compiler (verb module)
//!
//! Renders an [`AbstractQuery`](crate::query::AbstractQuery) for the backend
//! of its target source: SQL text for relational sources, an aggregation
//! spec for OLAP sources.

mod aggregation;
mod error;
mod resolve;
mod sql;

pub use aggregation::{compile_aggregation, AggregationSpec, GranularitySpec};
pub use error::CompileError;
pub use sql::{compile_sql, TIMESTAMP_ALIAS};

use crate::catalog::{Backend, Source};
use crate::query::AbstractQuery;

/// A query rendered for one backend
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledQuery {
    Sql(String),
    Aggregation(AggregationSpec),
}

impl CompiledQuery {
    pub fn as_sql(&self) -> Option<&str> {
        match self {
            CompiledQuery::Sql(sql) => Some(sql),
            CompiledQuery::Aggregation(_) => None,
        }
    }

    pub fn as_aggregation(&self) -> Option<&AggregationSpec> {
        match self {
            CompiledQuery::Aggregation(spec) => Some(spec),
            CompiledQuery::Sql(_) => None,
        }
    }
}

/// Compile with the renderer matching the source's backend
pub fn compile(source: &Source, query: &AbstractQuery) -> Result<CompiledQuery, CompileError> {
    match source.backend {
        Backend::Relational { .. } => compile_sql(source, query).map(CompiledQuery::Sql),
        Backend::Olap { .. } => compile_aggregation(source, query).map(CompiledQuery::Aggregation),
    }
}
