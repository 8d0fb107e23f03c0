//! End-to-end workflow execution against a SQLite warehouse.

use std::path::Path;
use std::sync::Arc;

use quarry_config::{ConnectionDef, WorkflowDef};
use quarry_hook::{ConnectionRegistry, SqlHook, SqliteHook};
use quarry_workflow::Workflow;
use quarry_workflow_executor::{ExecutionError, WorkflowExecutor};
use serde_json::json;
use sqlx::{Connection, SqliteConnection};
use tokio_util::sync::CancellationToken;

fn database_url(dir: &Path) -> String {
  format!("sqlite://{}?mode=rwc", dir.join("warehouse.db").display())
}

async fn seed(url: &str) {
  let hook = SqliteHook::new("seed", url);
  for statement in [
    "CREATE TABLE staging_sales (id INTEGER, store TEXT, amount INTEGER)",
    "INSERT INTO staging_sales VALUES (1, 'north', 10), (2, 'south', 20), (3, 'north', 5)",
    "CREATE TABLE sales_fact (id INTEGER, store TEXT, amount INTEGER)",
    "CREATE TABLE store_totals (store TEXT, total INTEGER)",
  ] {
    hook.run(statement).await.expect("seed statement failed");
  }
}

async fn count_rows(url: &str, table: &str) -> i64 {
  let mut conn = SqliteConnection::connect(url)
    .await
    .expect("failed to connect");
  let sql = format!("SELECT COUNT(*) FROM {}", table);
  let count: i64 = sqlx::query_scalar(&sql)
    .fetch_one(&mut conn)
    .await
    .expect("failed to count rows");
  count
}

fn executor(url: &str) -> WorkflowExecutor {
  let def = ConnectionDef::from_url("warehouse", url).expect("valid url");
  let connections = ConnectionRegistry::from_defs([&def]).expect("registry");
  WorkflowExecutor::new(Arc::new(connections))
}

fn workflow(totals_query: &str) -> Workflow {
  let def: WorkflowDef = serde_json::from_value(json!({
    "workflow_id": "sales",
    "name": "Sales warehouse load",
    "tasks": [
      {
        "task_id": "load_sales_fact",
        "type": "load_fact",
        "conn_id": "warehouse",
        "table": "sales_fact",
        "select_query": "SELECT * FROM staging_sales"
      },
      {
        "task_id": "load_store_totals",
        "type": "load_fact",
        "conn_id": "warehouse",
        "table": "store_totals",
        "select_query": totals_query,
        "depends_on": ["load_sales_fact"]
      }
    ]
  }))
  .expect("valid workflow");
  Workflow::from_def(def).expect("workflow builds")
}

#[tokio::test]
async fn test_workflow_loads_fact_tables() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let url = database_url(dir.path());
  seed(&url).await;

  let result = executor(&url)
    .execute(
      &workflow("SELECT store, SUM(amount) FROM sales_fact GROUP BY store"),
      CancellationToken::new(),
    )
    .await
    .expect("workflow failed");

  assert_eq!(result.task_results.len(), 2);
  assert_eq!(count_rows(&url, "sales_fact").await, 3);
  assert_eq!(count_rows(&url, "store_totals").await, 2);
}

#[tokio::test]
async fn test_rerun_inserts_again() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let url = database_url(dir.path());
  seed(&url).await;

  let executor = executor(&url);
  let workflow = workflow("SELECT store, SUM(amount) FROM staging_sales GROUP BY store");

  for _ in 0..2 {
    executor
      .execute_task(&workflow, "load_sales_fact", CancellationToken::new())
      .await
      .expect("task failed");
  }

  assert_eq!(count_rows(&url, "sales_fact").await, 6);
}

#[tokio::test]
async fn test_failed_task_reports_database_error() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let url = database_url(dir.path());
  seed(&url).await;

  let err = executor(&url)
    .execute(
      &workflow("SELECT store, SUM(amount) FROM missing_table GROUP BY store"),
      CancellationToken::new(),
    )
    .await
    .expect_err("workflow should fail");

  assert!(matches!(
    err,
    ExecutionError::TaskExecution { ref task_id, .. } if task_id == "load_store_totals"
  ));
  assert_eq!(count_rows(&url, "sales_fact").await, 3);
  assert_eq!(count_rows(&url, "store_totals").await, 0);
}
