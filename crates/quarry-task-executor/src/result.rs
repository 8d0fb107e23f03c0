//! Task execution result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a task execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
  /// Unique ID of this run.
  pub run_id: String,
  /// Task ID within the workflow.
  pub task_id: String,
  /// Registered type of the task.
  pub task_type: String,
  pub started_at: DateTime<Utc>,
  pub completed_at: DateTime<Utc>,
}
