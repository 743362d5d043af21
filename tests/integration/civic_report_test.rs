//! Live report tests against the fixture schema.
//!
//! Skipped unless DATABASE_URL is set and `tests/fixtures/civic_schema.sql`
//! has been loaded into that database.

use panchayat_report::config::ConnectionConfig;
use panchayat_report::db::{DatabaseClient, PostgresClient, Value};
use panchayat_report::report::{civic_queries, run_report, ReportQuery};
use pretty_assertions::assert_eq;

/// Connects to DATABASE_URL if the fixture tables are present.
async fn get_fixture_client() -> Option<PostgresClient> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    let client = PostgresClient::connect(&config).await.ok()?;

    let loaded = client
        .execute_query("SELECT to_regclass('public.citizens') IS NOT NULL AS loaded")
        .await
        .ok()?;
    if loaded.rows.first().and_then(|row| row.first()) == Some(&Value::Bool(true)) {
        Some(client)
    } else {
        let _ = client.close().await;
        None
    }
}

fn query(id: &str) -> ReportQuery {
    civic_queries()
        .into_iter()
        .find(|q| q.id == id)
        .expect("built-in query exists")
}

/// Runs one built-in query and returns its data lines.
async fn data_lines(client: &PostgresClient, id: &str) -> Vec<String> {
    let result = client.execute_query(&query(id).sql).await.unwrap();
    result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect()
}

fn sorted(mut lines: Vec<String>) -> Vec<String> {
    lines.sort();
    lines
}

#[tokio::test]
async fn test_fixture_answers() {
    let Some(client) = get_fixture_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set or fixture not loaded");
        return;
    };

    assert_eq!(
        sorted(data_lines(&client, "A").await),
        vec!["Kavita", "Mahesh", "Ramesh"]
    );
    assert_eq!(data_lines(&client, "C").await, vec!["3.00"]);
    assert_eq!(data_lines(&client, "D").await, vec!["2"]);
    assert_eq!(sorted(data_lines(&client, "E").await), vec!["Kavita", "Ramesh"]);
    assert_eq!(
        sorted(data_lines(&client, "F").await),
        vec!["Priya", "Ramesh", "Sunita"]
    );
    assert_eq!(data_lines(&client, "G").await, vec!["1"]);
    assert_eq!(data_lines(&client, "I").await, vec!["1"]);
    assert_eq!(data_lines(&client, "J").await, vec!["5"]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_full_report_runs_clean() {
    let Some(client) = get_fixture_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set or fixture not loaded");
        return;
    };
    let mut out = Vec::new();

    let summary = run_report(&client, &civic_queries(), &mut out).await;

    assert!(summary.is_clean(), "failed queries: {:?}", summary.failed);
    assert_eq!(summary.succeeded.len(), 10);

    // run_report closed the connection
    assert!(client.execute_query("SELECT 1").await.is_err());
}

#[tokio::test]
async fn test_malformed_query_is_isolated() {
    let Some(client) = get_fixture_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set or fixture not loaded");
        return;
    };
    let mut queries = civic_queries();
    queries[2].sql = "SELECT SUM(aera_acres) FROM land_records".to_string();
    let mut out = Vec::new();

    let summary = run_report(&client, &queries, &mut out).await;

    assert_eq!(summary.failed, vec!["C"]);
    assert_eq!(summary.succeeded.len(), 9);

    let output = String::from_utf8(out).unwrap();
    let rice_label = format!("{}\n", queries[2].label);
    let next_label = queries[3].label.as_str();
    let after_rice = output
        .split_once(&rice_label)
        .map(|(_, rest)| rest)
        .unwrap();
    assert!(after_rice.starts_with(next_label), "no rows after failed label");
}
