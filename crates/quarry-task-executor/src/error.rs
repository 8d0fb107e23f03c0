//! Task execution errors.

use quarry_task::TaskError;

/// Errors that can occur during task execution.
#[derive(Debug, thiserror::Error)]
pub enum TaskExecutionError {
  /// Task execution was cancelled.
  #[error("task cancelled")]
  Cancelled,

  /// Task did not finish within its timeout.
  #[error("task timed out after {timeout_ms}ms")]
  Timeout { timeout_ms: u64 },

  /// The task itself failed.
  #[error("task failed: {source}")]
  Task {
    #[source]
    source: TaskError,
  },
}
