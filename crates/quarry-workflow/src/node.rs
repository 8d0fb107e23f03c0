use std::sync::Arc;

use quarry_config::TaskType;
use quarry_task::Task;

/// A built task and the settings the host needs to schedule it.
#[derive(Debug, Clone)]
pub struct Node {
  pub task_id: String,
  /// The configuration the task was built from.
  pub config: TaskType,
  pub task: Arc<dyn Task>,
  pub depends_on: Vec<String>,
  /// Effective timeout (task value, else workflow default).
  pub timeout_ms: Option<u64>,
}
