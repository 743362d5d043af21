//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! over a single sqlx connection.

use crate::config::ConnectionConfig;
use crate::db::{ColumnInfo, DatabaseClient, QueryResult, Row, Value};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::types::{PgInterval, PgMoney};
use sqlx::postgres::{PgColumn, PgConnectOptions, PgConnection, PgRow, Postgres};
use sqlx::{
    Column as SqlxColumn, ConnectOptions, Connection, Decode, Executor, Row as SqlxRow, Statement,
    Type, TypeInfo,
};
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::debug;

/// PostgreSQL database client holding exactly one connection.
#[derive(Debug)]
pub struct PostgresClient {
    conn: Mutex<Option<PgConnection>>,
}

impl PostgresClient {
    /// Opens a single connection described by `config`. No retries are made.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = connect_options(config)?;

        debug!("Connecting to {}", config.display_string());
        let conn = options
            .connect()
            .await
            .map_err(|e| map_connection_error(e, config))?;

        Ok(Self::from_connection(conn))
    }

    /// Wraps an already open connection.
    pub fn from_connection(conn: PgConnection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Fetches column metadata by preparing the statement without running it.
    async fn fetch_column_metadata(conn: &mut PgConnection, sql: &str) -> Vec<ColumnInfo> {
        match (&mut *conn).prepare(sql).await {
            Ok(statement) => statement
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            Err(e) => {
                debug!("Could not describe empty result: {e}");
                Vec::new()
            }
        }
    }
}

/// Builds the driver options for `config`.
///
/// Credentials are passed as plain values, so no URL escaping applies. The
/// session is opened read-only as a second line behind the query guard.
fn connect_options(config: &ConnectionConfig) -> Result<PgConnectOptions> {
    let database = config
        .database
        .as_deref()
        .ok_or_else(|| ReportError::config("Database name is required"))?;

    let mut options = PgConnectOptions::new()
        .host(config.host_or_default())
        .port(config.port_or_default())
        .database(database)
        .options([("default_transaction_read_only", "on")]);

    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }

    Ok(options)
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| ReportError::connection("Connection is already closed"))?;

        let start = Instant::now();
        let result = sqlx::query(sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| ReportError::query(format_query_error(e)))?;
        let execution_time = start.elapsed();

        // Empty results carry no row to read the shape from
        let columns: Vec<ColumnInfo> = match result.first() {
            Some(first_row) => first_row
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            None => Self::fetch_column_metadata(conn, sql).await,
        };

        let rows = result.iter().map(convert_row).collect::<Result<Vec<Row>>>()?;
        debug!("Query returned {} rows in {:?}", rows.len(), execution_time);

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        let Some(conn) = self.conn.lock().await.take() else {
            return Ok(());
        };
        conn.close()
            .await
            .map_err(|e| ReportError::connection(format!("Error while closing: {e}")))
    }
}

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Result<Row> {
    row.columns()
        .iter()
        .map(|col| convert_value(row, col))
        .collect()
}

/// Decodes one nullable column, naming the column if the value cannot be read.
fn decode<'r, T>(row: &'r PgRow, col: &PgColumn) -> Result<Option<T>>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<Option<T>, _>(col.ordinal()).map_err(|e| {
        ReportError::query(format!(
            "Cannot print column '{}' of type {}: {e}",
            col.name(),
            col.type_info().name()
        ))
    })
}

/// Converts a single column value from a PgRow to our Value type.
///
/// Types without a decoder here fail the query rather than print as NULL.
fn convert_value(row: &PgRow, col: &PgColumn) -> Result<Value> {
    let value = match col.type_info().name().to_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => decode::<bool>(row, col)?.map(Value::Bool),
        "INT2" | "SMALLINT" => decode::<i16>(row, col)?.map(|v| Value::Int(v.into())),
        "INT4" | "INT" | "INTEGER" => decode::<i32>(row, col)?.map(|v| Value::Int(v.into())),
        "INT8" | "BIGINT" => decode::<i64>(row, col)?.map(Value::Int),
        "FLOAT4" | "REAL" => decode::<f32>(row, col)?.map(|v| Value::Float(v.into())),
        "FLOAT8" | "DOUBLE PRECISION" => decode::<f64>(row, col)?.map(Value::Float),
        "NUMERIC" | "DECIMAL" => decode::<Decimal>(row, col)?.map(Value::Decimal),
        // lc_monetary with two fraction digits
        "MONEY" => decode::<PgMoney>(row, col)?.map(|m| Value::Decimal(m.to_decimal(2))),
        "DATE" => decode::<NaiveDate>(row, col)?.map(Value::Date),
        "TIME" => decode::<NaiveTime>(row, col)?.map(Value::Time),
        "TIMESTAMP" => decode::<NaiveDateTime>(row, col)?.map(Value::Timestamp),
        "TIMESTAMPTZ" => decode::<DateTime<Utc>>(row, col)?.map(Value::TimestampTz),
        "INTERVAL" => decode::<PgInterval>(row, col)?.map(|v| Value::String(format_interval(&v))),
        "JSON" | "JSONB" => decode::<serde_json::Value>(row, col)?.map(Value::Json),
        "BYTEA" => decode::<Vec<u8>>(row, col)?.map(Value::Bytes),
        // TEXT, VARCHAR, BPCHAR, NAME and friends
        _ => decode::<String>(row, col)?.map(Value::String),
    };

    Ok(value.unwrap_or(Value::Null))
}

/// Renders an interval the way the server's default `postgres` style does,
/// e.g. `24 years 3 mons 5 days` or `1 day 02:30:00`.
fn format_interval(interval: &PgInterval) -> String {
    fn unit(n: i64, name: &str) -> String {
        if n == 1 {
            format!("{n} {name}")
        } else {
            format!("{n} {name}s")
        }
    }

    let years = i64::from(interval.months / 12);
    let months = i64::from(interval.months % 12);
    let days = i64::from(interval.days);

    let mut parts = Vec::new();
    if years != 0 {
        parts.push(unit(years, "year"));
    }
    if months != 0 {
        parts.push(unit(months, "mon"));
    }
    if days != 0 {
        parts.push(unit(days, "day"));
    }

    let micros = interval.microseconds;
    if micros != 0 || parts.is_empty() {
        let sign = if micros < 0 { "-" } else { "" };
        let total = micros.unsigned_abs();
        let secs = total / 1_000_000;
        let fraction = total % 1_000_000;
        let mut time = format!(
            "{sign}{:02}:{:02}:{:02}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60
        );
        if fraction != 0 {
            let digits = format!("{fraction:06}");
            time.push('.');
            time.push_str(digits.trim_end_matches('0'));
        }
        parts.push(time);
    }

    parts.join(" ")
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> ReportError {
    let host = config.host_or_default();
    let port = config.port_or_default();
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        ReportError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
    {
        ReportError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        ReportError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("ssl") || error_str.contains("tls") {
        ReportError::connection(
            "Server requires SSL. Add '?sslmode=require' to connection string.".to_string(),
        )
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        ReportError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        ReportError::connection(error.to_string())
    }
}

/// Formats a query error, appending Postgres DETAIL and HINT fields when present.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }
        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }
        if let Some(column) = pg_error.column() {
            result.push_str("\n  COLUMN: ");
            result.push_str(column);
        }
    }

    result
}
