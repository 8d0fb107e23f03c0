//! Error types for workflow execution.

use quarry_task_executor::TaskExecutionError;
use thiserror::Error;

/// Errors that can occur during workflow execution.
#[derive(Debug, Error)]
pub enum ExecutionError {
  /// Task execution failed.
  #[error("task execution failed for task '{task_id}': {source}")]
  TaskExecution {
    task_id: String,
    #[source]
    source: TaskExecutionError,
  },

  /// Workflow execution was cancelled.
  #[error("workflow execution cancelled")]
  Cancelled,

  /// The requested task is not part of the workflow.
  #[error("task not found: {0}")]
  TaskNotFound(String),

  /// Workflow graph is invalid.
  #[error("invalid workflow graph: {message}")]
  InvalidGraph { message: String },
}
