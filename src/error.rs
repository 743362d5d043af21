//! Error types for panchayat-report.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for report operations.
#[derive(Error, Debug)]
pub enum ReportError {
    /// No database driver exists for the requested backend.
    #[error("Driver unavailable: {0}")]
    DriverUnavailable(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, type mismatches, etc.)
    #[error("Query failed: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (output write failures, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// Creates a driver-unavailable error with the given message.
    pub fn driver_unavailable(msg: impl Into<String>) -> Self {
        Self::DriverUnavailable(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DriverUnavailable(_) => "Driver Error",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if this error stops the whole run rather than a single query.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Query(_))
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        Self::internal(format!("Failed to write output: {e}"))
    }
}

/// Result type alias using ReportError.
pub type Result<T> = std::result::Result<T, ReportError>;
