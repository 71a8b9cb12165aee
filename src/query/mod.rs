//! Query types (nouns)
//!
//! The engine-independent query contract shared by both renderers.

mod error;
mod granularity;
mod request;

pub use error::QueryError;
pub use granularity::{isoformat, Granularity, TimeRange};
pub use request::{AbstractQuery, AbstractQueryBuilder, Filter};
