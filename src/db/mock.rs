//! Mock database clients for testing.
//!
//! Provides in-memory clients that return scripted results and record every
//! call, so report behavior can be checked without a running PostgreSQL.

use super::{DatabaseClient, QueryResult};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A mock database client that returns predefined results keyed by SQL text.
///
/// SQL without a scripted response returns an empty result with no columns.
#[derive(Default)]
pub struct MockDatabaseClient {
    responses: HashMap<String, std::result::Result<QueryResult, String>>,
    executed: Mutex<Vec<String>>,
    close_calls: AtomicUsize,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful result for the given SQL.
    pub fn with_result(mut self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.responses.insert(sql.into(), Ok(result));
        self
    }

    /// Scripts a query failure with the given database message.
    pub fn with_failure(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.insert(sql.into(), Err(message.into()));
        self
    }

    /// Returns every SQL string passed to `execute_query`, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|executed| executed.clone())
            .unwrap_or_default()
    }

    /// Returns how many times `close` was called.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    fn is_closed(&self) -> bool {
        self.close_calls() > 0
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if self.is_closed() {
            return Err(ReportError::connection("Connection is already closed"));
        }

        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }

        match self.responses.get(sql) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(message)) => Err(ReportError::query(message.clone())),
            None => Ok(QueryResult::new()),
        }
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A database client whose every query fails, as if the schema were missing.
#[derive(Default)]
pub struct FailingDatabaseClient {
    close_calls: AtomicUsize,
}

impl FailingDatabaseClient {
    /// Creates a new failing client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times `close` was called.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        Err(ReportError::query(format!("relation does not exist: {sql}")))
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
