//! Command-line arguments for panchayat-report.
//!
//! Every argument is optional; with none, the report runs against the
//! connection from the config file and the PG* environment variables.

use crate::config::{Config, ConnectionConfig};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Runs the panchayat civic-records report against PostgreSQL.
#[derive(Parser, Debug)]
#[command(name = "panchayat-report")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database URL, e.g. postgres://clerk@localhost/panchayat
    #[arg(value_name = "CONNECTION_STRING")]
    pub connection_string: Option<String>,

    /// Server host
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port [default: 5432]
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Database holding the civic records
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub database: Option<String>,

    /// Role to log in as
    #[arg(short = 'U', long, value_name = "USER")]
    pub user: Option<String>,

    /// Connection entry to use from the config file
    #[arg(short = 'c', long, value_name = "NAME")]
    pub connection: Option<String>,

    /// Config file to read instead of the platform default
    #[arg(long, value_name = "PATH", env = "PANCHAYAT_REPORT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Connection fields given on the command line, or `None` if there are none.
    ///
    /// A connection string wins over the individual flags. The password is
    /// never taken from flags; it comes from the URL, the config file or
    /// PGPASSWORD.
    pub fn to_connection_config(&self) -> Result<Option<ConnectionConfig>> {
        if let Some(conn_str) = &self.connection_string {
            return Ok(Some(ConnectionConfig::from_connection_string(conn_str)?));
        }

        let overrides = ConnectionConfig {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.user.clone(),
            ..Default::default()
        };
        let any_given = overrides.host.is_some()
            || overrides.port.is_some()
            || overrides.database.is_some()
            || overrides.user.is_some();

        Ok(any_given.then_some(overrides))
    }

    /// The `--config` path, or the platform default.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }
}
