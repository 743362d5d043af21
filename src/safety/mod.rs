//! Read-only query guard.
//!
//! Configured queries that would write to the database are rejected before
//! any connection is opened.

mod parser;

use crate::error::{ReportError, Result};
use tracing::debug;

/// Rejects SQL that parses as anything other than read-only queries.
///
/// SQL the parser cannot read is accepted. The server then reports it as a
/// failed query, which is isolated like any other.
pub fn ensure_read_only(sql: &str) -> Result<()> {
    let statements = match parser::parse(sql) {
        Ok(statements) => statements,
        Err(e) => {
            debug!("Guard could not parse query, leaving it to the server: {e}");
            return Ok(());
        }
    };

    match statements.iter().find_map(parser::find_write) {
        Some(kind) => Err(ReportError::config(format!(
            "{kind} is not allowed; only read-only SELECT queries can be run"
        ))),
        None => Ok(()),
    }
}
