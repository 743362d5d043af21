//! Top-level run: resolve configuration, connect once, run the report.

use std::io::Write;

use tracing::info;

use crate::cli::Cli;
use crate::config::{Config, ConnectionConfig};
use crate::db;
use crate::error::{ReportError, Result};
use crate::report::{run_report, ReportSummary};

/// Loads configuration, opens one connection, and runs every query.
///
/// Returns an error only for failures that stop the run before any query
/// executes: bad configuration, an unavailable driver, or a failed
/// connection.
pub async fn run<W: Write>(cli: &Cli, out: W) -> Result<ReportSummary> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = resolve_connection(cli, &config)?;
    let queries = config.report_queries()?;

    let client = db::connect(&connection).await?;
    Ok(run_report(client.as_ref(), &queries, out).await)
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// The named connection (or `default`) from the config file is the base;
/// CLI arguments override its fields, and PG* environment variables fill
/// whatever is still unset.
pub fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let mut connection = match cli.connection_name() {
        Some(name) => config.get_connection(Some(name)).cloned().ok_or_else(|| {
            ReportError::config(format!("Connection '{}' not found in config file", name))
        })?,
        None => config.get_connection(None).cloned().unwrap_or_default(),
    };

    if let Some(overrides) = cli.to_connection_config()? {
        connection.merge(&overrides);
    }

    connection.apply_env_defaults();
    Ok(connection)
}
