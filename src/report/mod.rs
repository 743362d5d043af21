//! Report execution for panchayat-report.
//!
//! Runs each configured query once, in order, over a single connection.
//! A failing query is logged and skipped; the connection is closed exactly
//! once when the run ends.

mod queries;
mod runner;

pub use queries::civic_queries;
pub use runner::QueryRunner;

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::db::DatabaseClient;

/// A labelled query in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Short identifier used in logs (e.g. "C").
    pub id: String,

    /// Human-readable line printed before the query's rows.
    pub label: String,

    /// The SQL text, run as-is with no bound parameters.
    pub sql: String,
}

impl ReportQuery {
    /// Creates a new report query.
    pub fn new(id: impl Into<String>, label: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            sql: sql.into(),
        }
    }
}

/// Outcome of a full report run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Ids of queries that printed their rows.
    pub succeeded: Vec<String>,

    /// Ids of queries that failed.
    pub failed: Vec<String>,

    /// Total data rows printed across all queries.
    pub rows_printed: usize,
}

impl ReportSummary {
    /// Returns true if every query succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs every query in order, then closes the client.
///
/// Query failures are logged and do not stop the run. A failure to write
/// output stops the remaining queries, since nothing further could be
/// printed. `close` is called exactly once on every path.
pub async fn run_report<W: Write>(
    db: &dyn DatabaseClient,
    queries: &[ReportQuery],
    out: W,
) -> ReportSummary {
    let mut runner = QueryRunner::new(db, out);
    let mut summary = ReportSummary::default();

    for query in queries {
        match runner.run(query).await {
            Ok(rows) => {
                summary.rows_printed += rows;
                summary.succeeded.push(query.id.clone());
            }
            Err(e) => {
                error!(id = %query.id, "{e}");
                summary.failed.push(query.id.clone());
                if e.is_fatal() {
                    break;
                }
            }
        }
    }

    if let Err(e) = db.close().await {
        warn!("Failed to close connection: {e}");
    }

    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        rows = summary.rows_printed,
        "Report finished"
    );

    summary
}
