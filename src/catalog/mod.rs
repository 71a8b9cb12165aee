//! Schema catalog types (nouns)
//!
//! Columns, metrics and the sources that own them. Pure data; mutation
//! happens through the reconciler and the metric deriver.

mod column;
mod metric;
mod schema;
mod source;
mod types;

pub use column::Column;
pub use metric::{Aggregator, MalformedExpression, Metric};
pub use schema::{Catalog, Cluster, Database};
pub use source::{Backend, Source};
pub use types::{DataType, MetricType, ParseMetricTypeError};
