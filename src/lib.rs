//! panchayat-report - runs the civic-records analytical queries.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod report;
pub mod safety;
