//! panorama - Metadata-driven analytics over relational tables and OLAP datasources
//!
//! This library provides:
//! - Catalog types (Source, Column, Metric, Backend) and YAML loading
//! - Metric derivation from per-column capability flags
//! - Reconciliation of the catalog against an external schema snapshot
//! - Query compilation to SQL text or to an OLAP aggregation spec
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `catalog/` - sources, columns, metrics, backends
//! - `query/` - abstract query types (AbstractQuery, Granularity, TimeRange, Filter)
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML → Catalog
//! - `deriver/` - Column flags → Metric definitions
//! - `reconciler/` - Schema snapshot → Catalog updates
//! - `compiler/` - Source + AbstractQuery → SQL or aggregation spec
//!
//! **Seams** (implemented outside this crate or swapped per deployment):
//! - `store/` - transactional catalog persistence (in-memory, SQLite)
//! - `executor/` - running compiled queries against a backend
//!
//! # Example
//!
//! ```ignore
//! use panorama::{parser, compile, AbstractQuery, MemoryStore, sync_source};
//!
//! let catalog = parser::parse_file("catalog.yaml")?;
//! let mut store = MemoryStore::from_catalog(&catalog);
//! sync_source(&mut store, "orders", &backend, &introspector)?;
//!
//! let source = panorama::store::load_source(&mut store, "orders")?.unwrap();
//! let query = AbstractQuery::builder(from, to)
//!     .groupby(["region"])
//!     .metrics(["sum__revenue"])
//!     .build()?;
//! let compiled = compile(&source, &query)?;
//! ```

pub mod catalog;
pub mod query;
pub mod parser;
pub mod store;
pub mod deriver;
pub mod reconciler;
pub mod compiler;
pub mod executor;
pub mod ident;
pub mod error;

// Re-export commonly used types
pub use catalog::{Aggregator, Backend, Catalog, Cluster, Column, Database, DataType, Metric, MetricType, Source};
pub use query::{AbstractQuery, Filter, Granularity, QueryError, TimeRange};
pub use store::{CatalogStore, CatalogTransaction, MemoryStore, SqliteStore, StoreError};
pub use deriver::{derive_metrics, generate_metrics, generate_source_metrics, DeriveError};
pub use reconciler::{
    reconcile, refresh_cluster, sync_source, FetchError, OlapMetadataClient, ReconcileError,
    ReconcileOutcome, ReconcileReport, SchemaFetcher, SchemaSnapshot, TimeBoundaryProbe,
};
pub use compiler::{compile, compile_aggregation, compile_sql, AggregationSpec, CompileError, CompiledQuery};
pub use executor::{run_query, ExecuteError, QueryExecutor, ResultSet};
pub use error::ParseError;
