use serde::{Deserialize, Serialize};

/// A task entry in a workflow definition.
///
/// The generic fields (`task_id`, `depends_on`, `timeout_ms`) are consumed by
/// the host; the flattened [`TaskType`] carries the type-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDef {
  pub task_id: String,
  #[serde(flatten)]
  pub task_type: TaskType,
  /// Upstream task IDs that must complete before this task runs.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub depends_on: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskType {
  /// Insert the rows of `select_query` into the fact table `table`.
  LoadFact {
    /// Connection the statement is submitted to.
    #[serde(alias = "redshift_conn_id")]
    conn_id: String,
    /// Destination table, used verbatim.
    table: String,
    /// SELECT statement whose rows are inserted.
    select_query: String,
  },
}

impl TaskType {
  /// The registered name of this task type, matching the `type` tag.
  pub fn name(&self) -> &'static str {
    match self {
      TaskType::LoadFact { .. } => "load_fact",
    }
  }

  /// Connection IDs this task will resolve at execution time.
  pub fn conn_ids(&self) -> Vec<&str> {
    match self {
      TaskType::LoadFact { conn_id, .. } => vec![conn_id.as_str()],
    }
  }
}
