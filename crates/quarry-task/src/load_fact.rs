//! Load a fact table with `INSERT INTO ... SELECT`.

use async_trait::async_trait;
use quarry_hook::{ConnectionRegistry, HookError};
use tracing::{debug, info};

use crate::error::{BuildError, TaskError};
use crate::types::{DisplayMeta, Task, TaskContext};

/// Inserts the rows of a SELECT statement into a fact table.
///
/// The statement is built by literal substitution:
///
/// ```text
/// INSERT INTO {table}
/// {select_query}
/// ```
///
/// Neither `table` nor `select_query` is escaped, parameterized or validated.
/// Both must come from trusted workflow definitions. Re-running the task
/// inserts the rows again; any deduplication belongs in `select_query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFactTask {
  conn_id: String,
  table: String,
  select_query: String,
}

impl LoadFactTask {
  pub const TYPE_NAME: &'static str = "load_fact";

  const DISPLAY: DisplayMeta = DisplayMeta {
    ui_color: Some("#F98866"),
    ui_fgcolor: None,
  };

  /// Create a task. Every parameter must be non-blank.
  pub fn new(
    conn_id: impl Into<String>,
    table: impl Into<String>,
    select_query: impl Into<String>,
  ) -> Result<Self, BuildError> {
    let conn_id = required("conn_id", conn_id.into())?;
    let table = required("table", table.into())?;
    let select_query = required("select_query", select_query.into())?;

    Ok(Self {
      conn_id,
      table,
      select_query,
    })
  }

  pub fn conn_id(&self) -> &str {
    &self.conn_id
  }

  pub fn table(&self) -> &str {
    &self.table
  }

  pub fn select_query(&self) -> &str {
    &self.select_query
  }

  /// The statement submitted on every run.
  pub fn statement(&self) -> String {
    format!("INSERT INTO {}\n{}", self.table, self.select_query)
  }

  /// Submit the statement once to the hook registered for `conn_id`.
  ///
  /// Hook errors are returned exactly as the hook reported them.
  pub async fn load(&self, connections: &ConnectionRegistry) -> Result<(), HookError> {
    let hook = connections.resolve(&self.conn_id)?;
    let statement = self.statement();

    info!(conn_id = %self.conn_id, table = %self.table, "loading fact table");
    debug!(statement = %statement, "submitting statement");

    hook.run(&statement).await
  }
}

#[async_trait]
impl Task for LoadFactTask {
  fn type_name(&self) -> &'static str {
    Self::TYPE_NAME
  }

  fn display(&self) -> DisplayMeta {
    Self::DISPLAY
  }

  fn render(&self) -> Option<String> {
    Some(self.statement())
  }

  async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
    self.load(&ctx.connections).await?;
    Ok(())
  }
}

fn required(field: &'static str, value: String) -> Result<String, BuildError> {
  if value.trim().is_empty() {
    return Err(BuildError::MissingParameter { field });
  }
  Ok(value)
}
