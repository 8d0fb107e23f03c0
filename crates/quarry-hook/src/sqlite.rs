use async_trait::async_trait;
use sqlx::{Connection, SqliteConnection};
use tracing::debug;

use crate::error::HookError;
use crate::hook::SqlHook;

/// Hook over a SQLite database file.
///
/// Opens a fresh connection for every statement and closes it afterwards, so
/// `sqlite::memory:` URLs do not keep data between runs.
pub struct SqliteHook {
  conn_id: String,
  url: String,
}

impl SqliteHook {
  pub fn new(conn_id: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      conn_id: conn_id.into(),
      url: url.into(),
    }
  }
}

#[async_trait]
impl SqlHook for SqliteHook {
  async fn run(&self, statement: &str) -> Result<(), HookError> {
    let mut conn = SqliteConnection::connect(&self.url).await?;
    let result = sqlx::query(statement).execute(&mut conn).await?;
    debug!(
      conn_id = %self.conn_id,
      rows_affected = result.rows_affected(),
      "statement completed"
    );
    conn.close().await?;
    Ok(())
  }
}
