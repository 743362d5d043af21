//! Database access for panchayat-report.
//!
//! Provides a trait-based interface over a single database connection so the
//! report driver can run against PostgreSQL or an in-memory test double.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseBackend {
    #[default]
    Postgres,
}

impl DatabaseBackend {
    /// Returns the backend's canonical driver name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
        }
    }

    /// Parses a backend from a driver name or URL scheme.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }

    /// Returns the default port for this backend.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Postgres => 5432,
        }
    }
}

/// Opens one connection for the configured backend.
///
/// The driver is resolved before any network activity, so an unsupported
/// driver fails with `DriverUnavailable` without a connection attempt.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    match config.backend()? {
        DatabaseBackend::Postgres => {
            let client = PostgresClient::connect(config).await?;
            info!("Connected to {}", config.display_string());
            Ok(Box::new(client))
        }
    }
}

/// Trait defining the interface for database clients.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL query and returns the fully materialized results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection. Closing twice is a no-op.
    async fn close(&self) -> Result<()>;
}
