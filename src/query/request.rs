use chrono::NaiveDateTime;
use serde_json::Value;
use super::error::QueryError;
use super::granularity::{Granularity, TimeRange};

/// Backend-specific predicate attached to a query
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// SQL predicate text, ANDed into the relational WHERE clause as-is
    Sql(String),
    /// Structured filter object passed through to the aggregation spec
    Structured(Value),
}

/// An engine-independent analytical query
///
/// Built through [`AbstractQuery::builder`], which validates the time range,
/// limits and granularity.
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractQuery {
    /// Dimension columns, in output order
    pub groupby: Vec<String>,
    /// Requested metric names, deduplicated, in request order
    pub metrics: Vec<String>,
    pub granularity: Granularity,
    pub time_range: TimeRange,
    pub filter: Option<Filter>,
    pub is_timeseries: bool,
    pub timeseries_limit: u32,
    pub row_limit: Option<u64>,
    /// Opaque limit spec for the aggregation renderer
    pub limit_spec: Option<Value>,
}

impl AbstractQuery {
    pub const DEFAULT_TIMESERIES_LIMIT: u32 = 15;

    pub fn builder(from: NaiveDateTime, to: NaiveDateTime) -> AbstractQueryBuilder {
        AbstractQueryBuilder {
            from,
            to,
            groupby: Vec::new(),
            metrics: Vec::new(),
            granularity: Granularity::all(),
            filter: None,
            is_timeseries: true,
            timeseries_limit: Self::DEFAULT_TIMESERIES_LIMIT,
            row_limit: None,
            limit_spec: None,
        }
    }

    pub fn from(&self) -> NaiveDateTime {
        self.time_range.from
    }

    pub fn to(&self) -> NaiveDateTime {
        self.time_range.to
    }
}

/// Builder for [`AbstractQuery`]
#[derive(Debug, Clone)]
pub struct AbstractQueryBuilder {
    from: NaiveDateTime,
    to: NaiveDateTime,
    groupby: Vec<String>,
    metrics: Vec<String>,
    granularity: Granularity,
    filter: Option<Filter>,
    is_timeseries: bool,
    timeseries_limit: u32,
    row_limit: Option<u64>,
    limit_spec: Option<Value>,
}

impl AbstractQueryBuilder {
    pub fn groupby<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groupby = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn timeseries(mut self, is_timeseries: bool) -> Self {
        self.is_timeseries = is_timeseries;
        self
    }

    pub fn timeseries_limit(mut self, limit: u32) -> Self {
        self.timeseries_limit = limit;
        self
    }

    pub fn row_limit(mut self, limit: u64) -> Self {
        self.row_limit = Some(limit);
        self
    }

    pub fn limit_spec(mut self, spec: Value) -> Self {
        self.limit_spec = Some(spec);
        self
    }

    pub fn build(self) -> Result<AbstractQuery, QueryError> {
        let time_range = TimeRange::new(self.from, self.to)?;
        self.granularity.validate()?;

        if self.timeseries_limit == 0 {
            return Err(QueryError::InvalidTimeseriesLimit(0));
        }
        if let Some(0) = self.row_limit {
            return Err(QueryError::InvalidRowLimit(0));
        }

        // Metrics are a set; keep the first occurrence of each name
        let mut metrics: Vec<String> = Vec::with_capacity(self.metrics.len());
        for name in self.metrics {
            if !metrics.contains(&name) {
                metrics.push(name);
            }
        }

        Ok(AbstractQuery {
            groupby: self.groupby,
            metrics,
            granularity: self.granularity,
            time_range,
            filter: self.filter,
            is_timeseries: self.is_timeseries,
            timeseries_limit: self.timeseries_limit,
            row_limit: self.row_limit,
            limit_spec: self.limit_spec,
        })
    }
}
