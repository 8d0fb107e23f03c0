//! Integration tests for SqliteHook against a real database file.

use std::path::Path;

use quarry_config::ConnectionDef;
use quarry_hook::{ConnectionRegistry, HookError, SqlHook, SqliteHook};
use sqlx::{Connection, SqliteConnection};

fn database_url(dir: &Path) -> String {
  format!("sqlite://{}?mode=rwc", dir.join("warehouse.db").display())
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

#[tokio::test]
async fn test_run_persists_across_connections() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let url = database_url(dir.path());
  let hook = SqliteHook::new("local", &url);

  hook
    .run("CREATE TABLE staging_sales (id INTEGER, amount INTEGER)")
    .await
    .expect("create staging");
  hook
    .run("INSERT INTO staging_sales VALUES (1, 10), (2, 20), (3, 30)")
    .await
    .expect("seed staging");
  hook
    .run("CREATE TABLE sales_fact (id INTEGER, amount INTEGER)")
    .await
    .expect("create fact");

  hook
    .run("INSERT INTO sales_fact\nSELECT * FROM staging_sales")
    .await
    .expect("insert select");

  assert_eq!(count_rows(&url, "sales_fact").await, 3);
}

#[tokio::test]
async fn test_run_reports_database_errors() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let hook = SqliteHook::new("local", database_url(dir.path()));

  let err = hook
    .run("INSERT INTO missing_table SELECT 1")
    .await
    .unwrap_err();

  assert!(matches!(err, HookError::Database(_)));
}

#[tokio::test]
async fn test_registry_builds_sqlite_hook_from_url() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let url = database_url(dir.path());
  let def = ConnectionDef::from_url("local", &url).expect("valid url");

  let registry = ConnectionRegistry::from_defs([&def]).expect("registry");
  let hook = registry.resolve("local").expect("hook registered");

  hook
    .run("CREATE TABLE events (id INTEGER)")
    .await
    .expect("create table");
  hook
    .run("INSERT INTO events VALUES (1)")
    .await
    .expect("insert");

  assert_eq!(count_rows(&url, "events").await, 1);
}
