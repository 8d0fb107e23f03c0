use serde::{Deserialize, Serialize};

use crate::task::TaskDef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDef {
  pub workflow_id: String,
  pub name: String,
  /// Default timeout applied to tasks that do not set their own.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeout_ms: Option<u64>,
  pub tasks: Vec<TaskDef>,
}
