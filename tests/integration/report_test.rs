//! Report run tests against in-memory clients.
//!
//! Covers the ten built-in queries end to end without a database.

use panchayat_report::config::Config;
use panchayat_report::db::{ColumnInfo, FailingDatabaseClient, MockDatabaseClient, QueryResult, Value};
use panchayat_report::report::{civic_queries, run_report, ReportQuery};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

fn query(id: &str) -> ReportQuery {
    civic_queries()
        .into_iter()
        .find(|q| q.id == id)
        .expect("built-in query exists")
}

fn names(rows: &[&str]) -> QueryResult {
    QueryResult::with_data(
        vec![ColumnInfo::new("name", "TEXT")],
        rows.iter().map(|name| vec![Value::from(*name)]).collect(),
    )
}

fn count(n: i64) -> QueryResult {
    QueryResult::with_data(vec![ColumnInfo::new("count", "INT8")], vec![vec![Value::Int(n)]])
}

/// Splits report output into (label, data lines) sections using the known labels.
fn sections(output: &str, queries: &[ReportQuery]) -> Vec<(String, Vec<String>)> {
    let mut result: Vec<(String, Vec<String>)> = Vec::new();
    for line in output.lines() {
        if queries.iter().any(|q| q.label == line) {
            result.push((line.to_string(), Vec::new()));
        } else if let Some((_, rows)) = result.last_mut() {
            rows.push(line.to_string());
        }
    }
    result
}

#[tokio::test]
async fn test_every_query_prints_one_label_line() {
    let queries = civic_queries();
    let client = MockDatabaseClient::new()
        .with_result(query("A").sql, names(&["Ramesh", "Kavita"]))
        .with_result(query("D").sql, count(2));
    let mut out = Vec::new();

    let summary = run_report(&client, &queries, &mut out).await;

    let output = String::from_utf8(out).unwrap();
    let sections = sections(&output, &queries);
    let labels: Vec<&str> = sections.iter().map(|(label, _)| label.as_str()).collect();
    let expected: Vec<&str> = queries.iter().map(|q| q.label.as_str()).collect();

    assert_eq!(labels, expected);
    assert_eq!(sections[0].1, vec!["Ramesh", "Kavita"]);
    assert_eq!(sections[3].1, vec!["2"]);
    assert!(sections[1].1.is_empty());
    assert_eq!(summary.succeeded.len(), 10);
    assert_eq!(summary.rows_printed, 3);
}

#[tokio::test]
async fn test_one_malformed_query_does_not_stop_the_others() {
    let queries = civic_queries();
    let client = MockDatabaseClient::new()
        .with_failure(query("E").sql, "column e.nme does not exist")
        .with_result(query("F").sql, names(&["Ramesh", "Sunita", "Priya"]));
    let mut out = Vec::new();

    let summary = run_report(&client, &queries, &mut out).await;

    assert_eq!(summary.failed, vec!["E"]);
    assert_eq!(summary.succeeded.len(), 9);
    assert_eq!(client.executed().len(), 10);

    let output = String::from_utf8(out).unwrap();
    let sections = sections(&output, &queries);
    assert_eq!(sections.len(), 10);
    assert!(sections[4].1.is_empty(), "failed query prints only its label");
    assert_eq!(sections[5].1, vec!["Ramesh", "Sunita", "Priya"]);
}

#[tokio::test]
async fn test_rice_query_prints_one_column() {
    let rice = query("C");
    let client = MockDatabaseClient::new().with_result(
        rice.sql.clone(),
        QueryResult::with_data(
            vec![ColumnInfo::new("total_land_area_inacres", "NUMERIC")],
            vec![vec![Value::Decimal(Decimal::new(300, 2))]],
        ),
    );
    let mut out = Vec::new();

    run_report(&client, std::slice::from_ref(&rice), &mut out).await;

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output, format!("{}\n3.00\n", rice.label));
    assert!(output.lines().all(|line| !line.contains('\t')));
}

#[tokio::test]
async fn test_close_once_when_everything_fails() {
    let queries = civic_queries();
    let client = FailingDatabaseClient::new();
    let mut out = Vec::new();

    let summary = run_report(&client, &queries, &mut out).await;

    assert_eq!(summary.failed.len(), 10);
    assert!(summary.succeeded.is_empty());
    assert_eq!(client.close_calls(), 1);

    // Labels are printed before execution, so all ten still appear
    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.lines().count(), 10);
}

#[tokio::test]
async fn test_close_once_on_clean_run() {
    let client = MockDatabaseClient::new();

    let summary = run_report(&client, &civic_queries(), Vec::new()).await;

    assert!(summary.is_clean());
    assert_eq!(client.close_calls(), 1);
}

#[tokio::test]
async fn test_unparseable_configured_query_fails_alone() {
    let config: Config = toml::from_str(
        r#"
[[queries]]
id = "A"
label = "Households:"
sql = "SELECT COUNT(*) FROM households"

[[queries]]
id = "B"
label = "Names:"
sql = "SELEC name FROM citizens"
"#,
    )
    .unwrap();
    let queries = config.report_queries().unwrap();
    let client = MockDatabaseClient::new()
        .with_result("SELECT COUNT(*) FROM households", count(4))
        .with_failure("SELEC name FROM citizens", "syntax error at or near \"SELEC\"");
    let mut out = Vec::new();

    let summary = run_report(&client, &queries, &mut out).await;

    assert_eq!(summary.succeeded, vec!["A"]);
    assert_eq!(summary.failed, vec!["B"]);
    assert_eq!(client.close_calls(), 1);
    assert_eq!(String::from_utf8(out).unwrap(), "Households:\n4\nNames:\n");
}
