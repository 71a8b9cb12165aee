//! Metric deriver (verb module)
//!
//! Column capability flags → metric definitions, written idempotently.

mod derive;
mod error;

pub use derive::{
    count_metric, derive_metrics, ensure_count_metric, generate_metrics, generate_source_metrics,
    COUNT_METRIC,
};
pub use error::DeriveError;
