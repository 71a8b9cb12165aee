//! SQLite-backed catalog store
//!
//! Tables:
//! - `sources`: one row per source, backend descriptor as JSON
//! - `columns`: unique on `(source_name, column_name)`
//! - `metrics`: unique on `(source_name, metric_name)`
//!
//! Transactions are opened IMMEDIATE so that concurrent writers on separate
//! connections serialize on the database lock, and metric inserts use
//! `ON CONFLICT DO NOTHING` against the unique constraint.

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use crate::catalog::{Backend, Column, DataType, Metric, MetricType, Source};
use super::error::StoreError;
use super::{check_backend_kind, CatalogStore, CatalogTransaction};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize the catalog tables if they don't exist
pub fn init_sqlite_schema(conn: &Connection) -> Result<(), StoreError> {
    let ddl = r#"
    CREATE TABLE IF NOT EXISTS sources (
      name TEXT PRIMARY KEY,
      backend TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS columns (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      source_name TEXT NOT NULL,
      column_name TEXT NOT NULL,
      data_type TEXT NOT NULL,
      is_groupby INTEGER NOT NULL DEFAULT 0,
      is_filterable INTEGER NOT NULL DEFAULT 0,
      can_sum INTEGER NOT NULL DEFAULT 0,
      can_min INTEGER NOT NULL DEFAULT 0,
      can_max INTEGER NOT NULL DEFAULT 0,
      can_count_distinct INTEGER NOT NULL DEFAULT 0,
      is_active INTEGER NOT NULL DEFAULT 1,
      description TEXT,
      FOREIGN KEY (source_name) REFERENCES sources(name) ON DELETE CASCADE,
      UNIQUE(source_name, column_name)
    );

    CREATE TABLE IF NOT EXISTS metrics (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      source_name TEXT NOT NULL,
      metric_name TEXT NOT NULL,
      verbose_name TEXT NOT NULL DEFAULT '',
      metric_type TEXT NOT NULL,
      expression TEXT NOT NULL,
      description TEXT,
      FOREIGN KEY (source_name) REFERENCES sources(name) ON DELETE CASCADE,
      UNIQUE(source_name, metric_name)
    );

    CREATE INDEX IF NOT EXISTS idx_columns_source ON columns(source_name);
    CREATE INDEX IF NOT EXISTS idx_metrics_source ON metrics(source_name);
    "#;
    conn.execute_batch(ddl)?;
    Ok(())
}

/// Catalog store on a SQLite database
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a catalog database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_sqlite_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CatalogStore for SqliteStore {
    fn begin(&mut self) -> Result<Box<dyn CatalogTransaction + '_>, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(Box::new(SqliteTransaction { tx }))
    }
}

struct SqliteTransaction<'a> {
    tx: Transaction<'a>,
}

const COLUMN_FIELDS: &str = "column_name, data_type, is_groupby, is_filterable, can_sum, can_min, \
     can_max, can_count_distinct, is_active, description";

const METRIC_FIELDS: &str = "metric_name, verbose_name, metric_type, expression, description";

fn column_from_row(row: &Row<'_>) -> rusqlite::Result<Column> {
    let data_type: String = row.get(1)?;
    Ok(Column {
        name: row.get(0)?,
        data_type: DataType::parse(&data_type),
        is_groupby: row.get(2)?,
        is_filterable: row.get(3)?,
        sum: row.get(4)?,
        min: row.get(5)?,
        max: row.get(6)?,
        count_distinct: row.get(7)?,
        is_active: row.get(8)?,
        description: row.get(9)?,
    })
}

fn metric_from_row(row: &Row<'_>) -> rusqlite::Result<Metric> {
    let metric_name: String = row.get(0)?;
    let metric_type: String = row.get(2)?;
    // An unreadable type must not hide the whole source
    let metric_type = metric_type.parse::<MetricType>().unwrap_or_else(|e| {
        tracing::warn!(metric = %metric_name, error = %e, "Unknown stored metric type, treating as custom");
        MetricType::Custom
    });
    Ok(Metric {
        metric_name,
        verbose_name: row.get(1)?,
        metric_type,
        expression: row.get(3)?,
        description: row.get(4)?,
    })
}

impl SqliteTransaction<'_> {
    fn require_source(&self, name: &str) -> Result<(), StoreError> {
        let exists: Option<i64> = self
            .tx
            .query_row("SELECT 1 FROM sources WHERE name = ?1", [name], |row| row.get(0))
            .optional()?;
        match exists {
            Some(_) => Ok(()),
            None => Err(StoreError::SourceNotFound(name.to_string())),
        }
    }
}

impl CatalogTransaction for SqliteTransaction<'_> {
    fn get_source(&self, name: &str) -> Result<Option<Source>, StoreError> {
        let backend: Option<String> = self
            .tx
            .query_row("SELECT backend FROM sources WHERE name = ?1", [name], |row| row.get(0))
            .optional()?;
        let Some(backend) = backend else {
            return Ok(None);
        };
        let backend: Backend = serde_json::from_str(&backend)?;

        let mut stmt = self.tx.prepare(&format!(
            "SELECT {} FROM columns WHERE source_name = ?1 ORDER BY id",
            COLUMN_FIELDS
        ))?;
        let columns = stmt
            .query_map([name], column_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.tx.prepare(&format!(
            "SELECT {} FROM metrics WHERE source_name = ?1 ORDER BY id",
            METRIC_FIELDS
        ))?;
        let metrics = stmt
            .query_map([name], metric_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(Source {
            name: name.to_string(),
            backend,
            columns,
            metrics,
        }))
    }

    fn source_names(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.tx.prepare("SELECT name FROM sources ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    fn upsert_source(&mut self, name: &str, backend: &Backend) -> Result<bool, StoreError> {
        let backend_json = serde_json::to_string(backend)?;
        let existing: Option<String> = self
            .tx
            .query_row("SELECT backend FROM sources WHERE name = ?1", [name], |row| row.get(0))
            .optional()?;

        match existing {
            Some(existing) => {
                let existing: Backend = serde_json::from_str(&existing)?;
                check_backend_kind(name, &existing, backend)?;
                self.tx.execute(
                    "UPDATE sources SET backend = ?2 WHERE name = ?1",
                    params![name, backend_json],
                )?;
                Ok(false)
            }
            None => {
                let inserted = self.tx.execute(
                    "INSERT INTO sources (name, backend) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
                    params![name, backend_json],
                )?;
                Ok(inserted > 0)
            }
        }
    }

    fn get_column(&self, source: &str, column: &str) -> Result<Option<Column>, StoreError> {
        let column = self
            .tx
            .query_row(
                &format!(
                    "SELECT {} FROM columns WHERE source_name = ?1 AND column_name = ?2",
                    COLUMN_FIELDS
                ),
                [source, column],
                column_from_row,
            )
            .optional()?;
        Ok(column)
    }

    fn put_column(&mut self, source: &str, column: &Column) -> Result<(), StoreError> {
        self.require_source(source)?;
        self.tx.execute(
            r#"
            INSERT INTO columns (source_name, column_name, data_type, is_groupby, is_filterable,
                                 can_sum, can_min, can_max, can_count_distinct, is_active, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(source_name, column_name) DO UPDATE SET
                data_type = excluded.data_type,
                is_groupby = excluded.is_groupby,
                is_filterable = excluded.is_filterable,
                can_sum = excluded.can_sum,
                can_min = excluded.can_min,
                can_max = excluded.can_max,
                can_count_distinct = excluded.can_count_distinct,
                is_active = excluded.is_active,
                description = excluded.description
            "#,
            params![
                source,
                column.name,
                column.data_type.to_string(),
                column.is_groupby,
                column.is_filterable,
                column.sum,
                column.min,
                column.max,
                column.count_distinct,
                column.is_active,
                column.description,
            ],
        )?;
        Ok(())
    }

    fn get_metric(&self, source: &str, metric: &str) -> Result<Option<Metric>, StoreError> {
        let metric = self
            .tx
            .query_row(
                &format!(
                    "SELECT {} FROM metrics WHERE source_name = ?1 AND metric_name = ?2",
                    METRIC_FIELDS
                ),
                [source, metric],
                metric_from_row,
            )
            .optional()?;
        Ok(metric)
    }

    fn insert_metric(&mut self, source: &str, metric: &Metric) -> Result<bool, StoreError> {
        self.require_source(source)?;
        let inserted = self.tx.execute(
            r#"
            INSERT INTO metrics (source_name, metric_name, verbose_name, metric_type, expression, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(source_name, metric_name) DO NOTHING
            "#,
            params![
                source,
                metric.metric_name,
                metric.verbose_name,
                metric.metric_type.to_string(),
                metric.expression,
                metric.description,
            ],
        )?;
        Ok(inserted > 0)
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit()?;
        Ok(())
    }
}
