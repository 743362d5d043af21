//! Runs one labelled query and prints its rows.

use std::io::Write;

use tracing::debug;

use crate::db::{DatabaseClient, QueryResult};
use crate::error::Result;

use super::ReportQuery;

/// Prints query results as plain text: a label line, then one
/// tab-separated line per row.
pub struct QueryRunner<'a, W: Write> {
    db: &'a dyn DatabaseClient,
    out: W,
}

impl<'a, W: Write> QueryRunner<'a, W> {
    /// Creates a runner that prints to `out`.
    pub fn new(db: &'a dyn DatabaseClient, out: W) -> Self {
        Self { db, out }
    }

    /// Prints the label, executes the query, and prints every row.
    ///
    /// The label is written before execution and stays written if the query
    /// fails. Returns the number of data rows printed.
    pub async fn run(&mut self, query: &ReportQuery) -> Result<usize> {
        writeln!(self.out, "{}", query.label)?;
        self.out.flush()?;

        debug!(id = %query.id, "Executing query");
        let result = self.db.execute_query(&query.sql).await?;
        debug!(
            id = %query.id,
            rows = result.row_count(),
            "Query finished in {:?}",
            result.execution_time
        );

        self.print_rows(&result)?;
        Ok(result.row_count())
    }

    fn print_rows(&mut self, result: &QueryResult) -> Result<()> {
        let width = result.column_count();

        for row in &result.rows {
            let line = row
                .iter()
                .take(width)
                .map(|value| value.to_display_string())
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(self.out, "{line}")?;
        }

        self.out.flush()?;
        Ok(())
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
