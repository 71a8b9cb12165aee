//! Metadata reconciler
//!
//! Keeps the stored catalog in step with an externally authoritative schema:
//! fetch a snapshot, upsert columns, derive metrics per column.

mod error;
mod olap;
mod reconcile;
mod snapshot;

pub use error::{FetchError, ReconcileError};
pub use olap::{probe_interval, OlapMetadataClient, SegmentMetadata, TimeBoundaryProbe};
pub use reconcile::{reconcile, refresh_cluster, sync_source, ReconcileOutcome, ReconcileReport};
pub use snapshot::{ColumnDescriptor, SchemaFetcher, SchemaSnapshot};
