//! Task executor implementation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use quarry_hook::ConnectionRegistry;
use quarry_task::{Task, TaskContext, TaskError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::error::TaskExecutionError;
use crate::result::TaskResult;

/// Input required to execute a task.
pub struct TaskInput {
  /// Unique ID of this run.
  pub run_id: String,
  /// Execution ID this run belongs to.
  pub execution_id: String,
  /// Task ID being executed.
  pub task_id: String,
  /// Timeout in milliseconds.
  pub timeout_ms: Option<u64>,
}

/// Executes built tasks against the registered connections.
#[derive(Clone)]
pub struct TaskExecutor {
  connections: Arc<ConnectionRegistry>,
}

impl TaskExecutor {
  /// Create a new task executor over the given connections.
  pub fn new(connections: Arc<ConnectionRegistry>) -> Self {
    Self { connections }
  }

  /// Execute a task.
  #[instrument(
    name = "task_execute",
    skip(self, task, input, cancel),
    fields(
      execution_id = %input.execution_id,
      run_id = %input.run_id,
      task_id = %input.task_id,
      task_type = task.type_name(),
    )
  )]
  pub async fn execute(
    &self,
    task: &dyn Task,
    input: TaskInput,
    cancel: CancellationToken,
  ) -> Result<TaskResult, TaskExecutionError> {
    info!(timeout_ms = ?input.timeout_ms, "task started");

    let result = self.execute_inner(task, &input, cancel).await;

    match &result {
      Ok(task_result) => {
        let elapsed = task_result.completed_at - task_result.started_at;
        info!(duration_ms = elapsed.num_milliseconds(), "task completed");
      }
      Err(e) => {
        error!(error = %e, "task failed");
      }
    }

    result
  }

  /// Inner execution logic.
  async fn execute_inner(
    &self,
    task: &dyn Task,
    input: &TaskInput,
    cancel: CancellationToken,
  ) -> Result<TaskResult, TaskExecutionError> {
    if cancel.is_cancelled() {
      return Err(TaskExecutionError::Cancelled);
    }

    let ctx = TaskContext {
      execution_id: input.execution_id.clone(),
      task_id: input.task_id.clone(),
      connections: self.connections.clone(),
    };

    let started_at = Utc::now();
    let outcome = tokio::select! {
      outcome = run_with_timeout(task, &ctx, input.timeout_ms) => outcome?,
      _ = cancel.cancelled() => return Err(TaskExecutionError::Cancelled),
    };
    outcome.map_err(|source| TaskExecutionError::Task { source })?;

    Ok(TaskResult {
      run_id: input.run_id.clone(),
      task_id: input.task_id.clone(),
      task_type: task.type_name().to_string(),
      started_at,
      completed_at: Utc::now(),
    })
  }
}

async fn run_with_timeout(
  task: &dyn Task,
  ctx: &TaskContext,
  timeout_ms: Option<u64>,
) -> Result<Result<(), TaskError>, TaskExecutionError> {
  match timeout_ms {
    Some(ms) => tokio::time::timeout(Duration::from_millis(ms), task.execute(ctx))
      .await
      .map_err(|_| TaskExecutionError::Timeout { timeout_ms: ms }),
    None => Ok(task.execute(ctx).await),
  }
}
