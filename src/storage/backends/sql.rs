//! Relational student store over sqlx's `Any` driver

use async_trait::async_trait;
use sqlx::any::{AnyConnectOptions, AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, ConnectOptions, Row};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::{is_identifier, ColumnMapping, DatabaseConfig};
use crate::model::{Field, StudentRecord};
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::traits::StudentStore;

/// SQL flavour, picked from the URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    MySql,
    Postgres,
    Sqlite,
}

impl SqlDialect {
    pub fn from_url(url: &str) -> StoreResult<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(StoreError::configuration(format!(
                "unsupported database scheme '{}' (expected mysql, postgres or sqlite)",
                other
            ))),
        }
    }

    /// Type every column is cast to before decoding
    fn text_type(self) -> &'static str {
        match self {
            Self::MySql => "CHAR",
            Self::Postgres | Self::Sqlite => "TEXT",
        }
    }
}

/// Build the acquisition query; identifiers must already be validated
pub fn select_students(dialect: SqlDialect, table: &str, columns: &ColumnMapping) -> String {
    let projection = columns
        .pairs()
        .iter()
        .map(|(field, column)| {
            format!(
                "CAST({} AS {}) AS {}",
                column,
                dialect.text_type(),
                field.name()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {} FROM {}", projection, table)
}

/// Student store reading one table through a small connection pool
pub struct SqlStore {
    pool: AnyPool,
    dialect: SqlDialect,
    table: String,
    columns: ColumnMapping,
    redacted_url: String,
}

impl SqlStore {
    /// Connect to the configured database
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        if !is_identifier(&config.table) {
            return Err(StoreError::configuration(format!(
                "table name '{}' is not a plain SQL identifier",
                config.table
            )));
        }

        let url = config
            .connection_url()
            .map_err(|e| StoreError::configuration(e.to_string()))?;
        let dialect = SqlDialect::from_url(&url)?;
        let redacted_url = config.redacted().url;

        info!("Connecting to student database at {}", redacted_url);

        sqlx::any::install_default_drivers();

        let connect_options = AnyConnectOptions::from_str(&url)
            .map_err(|e| StoreError::configuration(format!("Invalid connection string: {}", e)))?
            .log_statements(log::LevelFilter::Debug)
            .log_slow_statements(log::LevelFilter::Warn, Duration::from_secs(1));

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(classify_error)?;

        Ok(Self {
            pool,
            dialect,
            table: config.table.clone(),
            columns: config.columns.clone(),
            redacted_url,
        })
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }
}

#[async_trait]
impl StudentStore for SqlStore {
    async fn load_students(&self) -> StoreResult<Vec<StudentRecord>> {
        let query = select_students(self.dialect, &self.table, &self.columns);
        debug!("Acquisition query: {}", query);

        let started = Instant::now();
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(classify_error)?;
        debug!("Fetched {} rows in {:?}", rows.len(), started.elapsed());

        rows.iter().map(decode_row).collect()
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.redacted_url, self.table)
    }
}

fn text_column(row: &AnyRow, field: Field) -> StoreResult<Option<String>> {
    row.try_get::<Option<String>, _>(field.name())
        .map_err(classify_error)
}

fn decode_row(row: &AnyRow) -> StoreResult<StudentRecord> {
    let student_id = text_column(row, Field::StudentId)?
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::integrity("row without student identifier"))?;

    Ok(StudentRecord {
        student_id,
        province: text_column(row, Field::Province)?,
        school: text_column(row, Field::School)?,
        faculty: text_column(row, Field::Faculty)?,
        registered_at: text_column(row, Field::RegisteredAt)?,
    })
}

const SCHEMA_STATES: &[&str] = &["42S02", "42S22", "42P01", "42703"];
const CONNECTION_STATES: &[&str] = &["28000", "28P01", "3D000"];
const SCHEMA_MESSAGES: &[&str] = &[
    "no such table",
    "no such column",
    "doesn't exist",
    "does not exist",
    "unknown column",
];
const CONNECTION_MESSAGES: &[&str] = &[
    "access denied",
    "authentication",
    "unable to open",
    "unknown database",
];

/// Sort a driver error into the acquisition taxonomy
///
/// SQLSTATEs are checked before message text, connection kinds before schema kinds.
pub fn classify_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => {
            let state = db.code().map(|c| c.to_string()).unwrap_or_default();
            let message = db.message().to_ascii_lowercase();
            if CONNECTION_STATES.contains(&state.as_str()) {
                StoreError::connection(db.message())
            } else if SCHEMA_STATES.contains(&state.as_str()) {
                StoreError::schema(db.message())
            } else if CONNECTION_MESSAGES.iter().any(|m| message.contains(m)) {
                StoreError::connection(db.message())
            } else if SCHEMA_MESSAGES.iter().any(|m| message.contains(m)) {
                StoreError::schema(db.message())
            } else {
                StoreError::query(db.message())
            }
        }
        sqlx::Error::ColumnNotFound(column) => {
            StoreError::schema(format!("column '{}' not found in result", column))
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Protocol(_) => StoreError::connection(err.to_string()),
        sqlx::Error::Configuration(_) => StoreError::configuration(err.to_string()),
        _ => StoreError::query(err.to_string()),
    }
}
