//! Shared test utilities for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use panorama::catalog::Source;
use panorama::reconciler::SegmentMetadata;
use panorama::{
    parser, AggregationSpec, Catalog, ExecuteError, FetchError, OlapMetadataClient, QueryExecutor,
    ResultSet, SchemaFetcher, SchemaSnapshot,
};
use serde_json::{Map, Value};

/// Load a test fixture from the tests/test_data directory
pub fn load_fixture(name: &str) -> Catalog {
    let path = format!("tests/test_data/{}", name);
    parser::parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_else(|| panic!("invalid date {}-{}-{}", y, m, d))
}

// =============================================================================
// Schema collaborators
// =============================================================================

/// Fetcher answering from a fixed table of snapshots; unknown sources fail
#[derive(Default)]
pub struct StaticFetcher {
    pub snapshots: HashMap<String, SchemaSnapshot>,
}

impl StaticFetcher {
    pub fn with(mut self, source: &str, snapshot: SchemaSnapshot) -> Self {
        self.snapshots.insert(source.to_string(), snapshot);
        self
    }
}

impl SchemaFetcher for StaticFetcher {
    fn fetch_schema(&self, source: &Source) -> Result<SchemaSnapshot, FetchError> {
        self.snapshots
            .get(&source.name)
            .cloned()
            .ok_or_else(|| FetchError::Unavailable(format!("no schema for {}", source.name)))
    }
}

/// In-process stand-in for an OLAP cluster's metadata endpoints
#[derive(Default)]
pub struct FakeCluster {
    pub reachable: bool,
    pub datasources: Vec<(String, Option<DateTime<Utc>>, Vec<SegmentMetadata>)>,
    pub intervals: RefCell<Vec<(String, String)>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self { reachable: true, ..Default::default() }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn with_datasource(
        mut self,
        name: &str,
        latest: Option<DateTime<Utc>>,
        segments: Vec<SchemaSnapshot>,
    ) -> Self {
        let segments = segments
            .into_iter()
            .enumerate()
            .map(|(i, columns)| SegmentMetadata { id: Some(format!("{}_{}", name, i)), columns })
            .collect();
        self.datasources.push((name.to_string(), latest, segments));
        self
    }
}

impl OlapMetadataClient for FakeCluster {
    fn list_datasources(&self) -> Result<Vec<String>, FetchError> {
        if !self.reachable {
            return Err(FetchError::Unavailable("connection refused".into()));
        }
        Ok(self.datasources.iter().map(|(name, _, _)| name.clone()).collect())
    }

    fn latest_timestamp(&self, datasource: &str) -> Result<Option<DateTime<Utc>>, FetchError> {
        self.datasources
            .iter()
            .find(|(name, _, _)| name == datasource)
            .map(|(_, latest, _)| *latest)
            .ok_or_else(|| FetchError::Malformed(format!("unknown datasource {}", datasource)))
    }

    fn segment_metadata(
        &self,
        datasource: &str,
        interval: &str,
    ) -> Result<Vec<SegmentMetadata>, FetchError> {
        self.intervals
            .borrow_mut()
            .push((datasource.to_string(), interval.to_string()));
        self.datasources
            .iter()
            .find(|(name, _, _)| name == datasource)
            .map(|(_, _, segments)| segments.clone())
            .ok_or_else(|| FetchError::Malformed(format!("unknown datasource {}", datasource)))
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Executor that records what it was asked to run and answers canned rows
#[derive(Default)]
pub struct RecordingExecutor {
    pub sql: RefCell<Vec<String>>,
    pub specs: RefCell<Vec<AggregationSpec>>,
    pub rows: Vec<Map<String, Value>>,
    pub fail_with: Option<String>,
}

impl RecordingExecutor {
    pub fn answering(rows: Vec<Value>) -> Self {
        Self {
            rows: rows.into_iter().filter_map(|v| v.as_object().cloned()).collect(),
            ..Default::default()
        }
    }

    fn answer(&self) -> Result<ResultSet, ExecuteError> {
        match &self.fail_with {
            Some(msg) => Err(ExecuteError::Backend(msg.clone())),
            None => Ok(ResultSet::new(self.rows.clone())),
        }
    }
}

impl QueryExecutor for RecordingExecutor {
    fn execute_sql(&self, _source: &Source, sql: &str) -> Result<ResultSet, ExecuteError> {
        self.sql.borrow_mut().push(sql.to_string());
        self.answer()
    }

    fn execute_aggregation(
        &self,
        _source: &Source,
        spec: &AggregationSpec,
    ) -> Result<ResultSet, ExecuteError> {
        self.specs.borrow_mut().push(spec.clone());
        self.answer()
    }
}
