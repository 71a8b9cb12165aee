//! OLAP time-boundary schema probe
//!
//! Segment metadata for a whole datasource is expensive, so the probe asks
//! for the latest ingested timestamp first and then only requests the
//! segments overlapping `[latest - 1s, latest + 1s]`. The last segment
//! returned describes the current schema.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use crate::catalog::Source;
use super::error::FetchError;
use super::snapshot::{SchemaFetcher, SchemaSnapshot};

/// One segment-metadata entry as answered by the cluster
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SegmentMetadata {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub columns: SchemaSnapshot,
}

/// Metadata endpoints of an OLAP cluster.
///
/// The HTTP transport lives outside this crate.
pub trait OlapMetadataClient {
    /// Names of the datasources hosted by the cluster
    fn list_datasources(&self) -> Result<Vec<String>, FetchError>;

    /// Latest ingested event time, `None` when the datasource has no data yet
    fn latest_timestamp(&self, datasource: &str) -> Result<Option<DateTime<Utc>>, FetchError>;

    /// Segment metadata for segments overlapping an ISO-8601 interval
    fn segment_metadata(
        &self,
        datasource: &str,
        interval: &str,
    ) -> Result<Vec<SegmentMetadata>, FetchError>;
}

/// `SchemaFetcher` for OLAP sources built on the time-boundary probe
pub struct TimeBoundaryProbe<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: OlapMetadataClient + ?Sized> TimeBoundaryProbe<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Probe a datasource by name
    pub fn probe(&self, datasource: &str) -> Result<SchemaSnapshot, FetchError> {
        let latest = match self.client.latest_timestamp(datasource)? {
            Some(ts) => ts,
            None => {
                tracing::debug!(datasource = %datasource, "No time boundary; datasource has no data yet");
                return Ok(SchemaSnapshot::new());
            }
        };

        let interval = probe_interval(latest);
        let segments = self.client.segment_metadata(datasource, &interval)?;
        Ok(segments.into_iter().last().map(|s| s.columns).unwrap_or_default())
    }
}

impl<C: OlapMetadataClient + ?Sized> SchemaFetcher for TimeBoundaryProbe<'_, C> {
    fn fetch_schema(&self, source: &Source) -> Result<SchemaSnapshot, FetchError> {
        self.probe(&source.name)
    }
}

/// The two-second interval centred on `latest`
pub fn probe_interval(latest: DateTime<Utc>) -> String {
    let window = Duration::seconds(1);
    format!(
        "{}/{}",
        (latest - window).to_rfc3339(),
        (latest + window).to_rfc3339()
    )
}
