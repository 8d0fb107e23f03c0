use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use tracing::debug;

use crate::error::HookError;
use crate::hook::SqlHook;

/// Hook over a PostgreSQL-protocol database (PostgreSQL, Redshift).
///
/// Opens a fresh connection for every statement and closes it afterwards.
pub struct PostgresHook {
  conn_id: String,
  url: String,
}

impl PostgresHook {
  pub fn new(conn_id: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      conn_id: conn_id.into(),
      url: url.into(),
    }
  }
}

#[async_trait]
impl SqlHook for PostgresHook {
  async fn run(&self, statement: &str) -> Result<(), HookError> {
    let mut conn = PgConnection::connect(&self.url).await?;
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
