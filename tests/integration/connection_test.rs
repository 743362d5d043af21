//! Connection integration tests.
//!
//! Tests connectivity and the fatal connection-level errors.

use panchayat_report::config::ConnectionConfig;
use panchayat_report::db::{self, DatabaseClient, PostgresClient};
use panchayat_report::error::ReportError;

/// Helper to get test database URL from environment.
fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

#[tokio::test]
async fn test_connect_with_valid_credentials() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let config = ConnectionConfig::from_connection_string(&url).unwrap();

    let client = db::connect(&config).await.unwrap();
    client.close().await.unwrap();
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_invalid_host() {
    let config = ConnectionConfig {
        host: Some("invalid.host.that.does.not.exist.local".to_string()),
        database: Some("panchayat".to_string()),
        user: Some("clerk".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let error = PostgresClient::connect(&config).await.unwrap_err();

    assert!(matches!(error, ReportError::Connection(_)));
    assert!(
        error.to_string().starts_with("Connection failed: "),
        "unexpected message: {error}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_invalid_port() {
    let config = ConnectionConfig {
        host: Some("localhost".to_string()),
        port: Some(59999),
        database: Some("panchayat".to_string()),
        user: Some("clerk".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let result = db::connect(&config).await;
    assert!(matches!(result, Err(ReportError::Connection(_))));
}

#[tokio::test]
async fn test_unsupported_driver() {
    let config = ConnectionConfig::from_connection_string("sqlserver://localhost/panchayat").unwrap();

    let result = db::connect(&config).await;

    assert!(matches!(result, Err(ReportError::DriverUnavailable(_))));
}

#[tokio::test]
async fn test_missing_database_name() {
    let config = ConnectionConfig {
        host: Some("localhost".to_string()),
        ..Default::default()
    };

    let result = db::connect(&config).await;

    assert!(matches!(result, Err(ReportError::Config(_))));
}
