//! Workflow executor implementation.

use std::collections::HashMap;
use std::sync::Arc;

use quarry_hook::ConnectionRegistry;
use quarry_task_executor::{TaskExecutionError, TaskExecutor, TaskInput, TaskResult};
use quarry_workflow::{Node, Workflow};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::error::ExecutionError;
use crate::result::ExecutionResult;

type TaskHandle = JoinHandle<Result<TaskResult, (String, TaskExecutionError)>>;

/// The workflow executor.
///
/// Handles graph traversal and scheduling, and orchestrates task execution
/// via [`TaskExecutor`].
pub struct WorkflowExecutor {
  task_executor: TaskExecutor,
}

impl WorkflowExecutor {
  /// Create a new workflow executor over the given connections.
  pub fn new(connections: Arc<ConnectionRegistry>) -> Self {
    Self {
      task_executor: TaskExecutor::new(connections),
    }
  }

  /// Execute every task of a workflow in dependency order.
  #[instrument(
    name = "workflow_execute",
    skip(self, workflow, cancel),
    fields(
      workflow_id = %workflow.workflow_id,
    )
  )]
  pub async fn execute(
    &self,
    workflow: &Workflow,
    cancel: CancellationToken,
  ) -> Result<ExecutionResult, ExecutionError> {
    let execution_id = uuid::Uuid::new_v4().to_string();

    info!(
      execution_id = %execution_id,
      workflow_id = %workflow.workflow_id,
      task_count = workflow.nodes.len(),
      "workflow_started"
    );

    let mut completed = HashMap::new();
    let result = self
      .run_execution_loop(workflow, &mut completed, &execution_id, &cancel)
      .await;

    match &result {
      Ok(_) => {
        info!(
          execution_id = %execution_id,
          "workflow_completed"
        );
      }
      Err(e) => {
        error!(
          execution_id = %execution_id,
          error = %e,
          "workflow_failed"
        );
      }
    }

    result
  }

  /// Execute a single task, ignoring its dependencies.
  #[instrument(
    name = "workflow_execute_task",
    skip(self, workflow, cancel),
    fields(
      workflow_id = %workflow.workflow_id,
    )
  )]
  pub async fn execute_task(
    &self,
    workflow: &Workflow,
    task_id: &str,
    cancel: CancellationToken,
  ) -> Result<ExecutionResult, ExecutionError> {
    let node = workflow
      .get_node(task_id)
      .ok_or_else(|| ExecutionError::TaskNotFound(task_id.to_string()))?;
    let execution_id = uuid::Uuid::new_v4().to_string();

    let task_result = self
      .task_executor
      .execute(
        node.task.as_ref(),
        task_input(node, &execution_id),
        cancel,
      )
      .await
      .map_err(|e| task_failure(task_id.to_string(), e))?;

    Ok(ExecutionResult {
      execution_id,
      task_results: HashMap::from([(task_id.to_string(), task_result)]),
    })
  }

  /// Run the main execution loop.
  async fn run_execution_loop(
    &self,
    workflow: &Workflow,
    completed: &mut HashMap<String, TaskResult>,
    execution_id: &str,
    cancel: &CancellationToken,
  ) -> Result<ExecutionResult, ExecutionError> {
    loop {
      if cancel.is_cancelled() {
        warn!(execution_id = %execution_id, "workflow cancelled");
        return Err(ExecutionError::Cancelled);
      }

      let ready = self.find_ready_tasks(workflow, completed);
      if ready.is_empty() {
        break;
      }

      info!(
        execution_id = %execution_id,
        ready_tasks = ?ready,
        "executing batch of ready tasks"
      );

      let handles: Vec<TaskHandle> = ready
        .iter()
        .filter_map(|task_id| workflow.get_node(task_id))
        .map(|node| self.spawn_task(node, execution_id, cancel))
        .collect();

      // Wait for all tasks
      let results = tokio::select! {
          results = futures::future::join_all(handles) => results,
          _ = cancel.cancelled() => {
            warn!(execution_id = %execution_id, "workflow cancelled during task execution");
            return Err(ExecutionError::Cancelled);
          }
      };

      // Process results
      for result in results {
        let join_result = result.map_err(|e| ExecutionError::InvalidGraph {
          message: format!("task join error: {}", e),
        })?;

        match join_result {
          Ok(task_result) => {
            info!(
              execution_id = %execution_id,
              run_id = %task_result.run_id,
              task_id = %task_result.task_id,
              "task_completed"
            );
            completed.insert(task_result.task_id.clone(), task_result);
          }
          Err((task_id, e)) => {
            error!(
              execution_id = %execution_id,
              task_id = %task_id,
              error = %e,
              "task_failed"
            );
            return Err(task_failure(task_id, e));
          }
        }
      }
    }

    if completed.len() < workflow.nodes.len() {
      return Err(ExecutionError::InvalidGraph {
        message: format!(
          "{} task(s) never became ready",
          workflow.nodes.len() - completed.len()
        ),
      });
    }

    Ok(ExecutionResult {
      execution_id: execution_id.to_string(),
      task_results: completed.clone(),
    })
  }

  /// Find tasks that are ready to execute (all upstream tasks completed).
  fn find_ready_tasks(
    &self,
    workflow: &Workflow,
    completed: &HashMap<String, TaskResult>,
  ) -> Vec<String> {
    let graph = workflow.graph();

    let mut ready: Vec<String> = workflow
      .nodes
      .keys()
      .filter(|id| !completed.contains_key(*id))
      .filter(|id| {
        graph
          .upstream(id)
          .iter()
          .all(|up| completed.contains_key(up))
      })
      .cloned()
      .collect();
    ready.sort();
    ready
  }

  /// Spawn the execution of one task.
  fn spawn_task(&self, node: &Node, execution_id: &str, cancel: &CancellationToken) -> TaskHandle {
    let task = node.task.clone();
    let task_executor = self.task_executor.clone();
    let cancel = cancel.clone();
    let task_id = node.task_id.clone();
    let input = task_input(node, execution_id);

    info!(
      execution_id = %execution_id,
      run_id = %input.run_id,
      task_id = %task_id,
      "task_started"
    );

    tokio::spawn(async move {
      task_executor
        .execute(task.as_ref(), input, cancel)
        .await
        .map_err(|e| (task_id, e))
    })
  }
}

fn task_input(node: &Node, execution_id: &str) -> TaskInput {
  TaskInput {
    run_id: uuid::Uuid::new_v4().to_string(),
    execution_id: execution_id.to_string(),
    task_id: node.task_id.clone(),
    timeout_ms: node.timeout_ms,
  }
}

fn task_failure(task_id: String, source: TaskExecutionError) -> ExecutionError {
  match source {
    TaskExecutionError::Cancelled => ExecutionError::Cancelled,
    source => ExecutionError::TaskExecution { task_id, source },
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use async_trait::async_trait;
  use quarry_config::WorkflowDef;
  use quarry_hook::{HookError, SqlHook};
  use quarry_task::TaskError;
  use serde_json::json;

  use super::*;

  /// Records every statement; fails statements mentioning `fail_on`.
  #[derive(Default)]
  struct RecordingHook {
    statements: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
  }

  impl RecordingHook {
    fn failing_on(table: &'static str) -> Self {
      Self {
        statements: Mutex::new(Vec::new()),
        fail_on: Some(table),
      }
    }

    fn statements(&self) -> Vec<String> {
      self.statements.lock().unwrap().clone()
    }
  }

  #[async_trait]
  impl SqlHook for RecordingHook {
    async fn run(&self, statement: &str) -> Result<(), HookError> {
      self.statements.lock().unwrap().push(statement.to_string());
      match self.fail_on {
        Some(table) if statement.contains(table) => Err(HookError::Database(
          sqlx::Error::Protocol(format!("permission denied for relation {table}")),
        )),
        _ => Ok(()),
      }
    }
  }

  fn workflow() -> Workflow {
    let def: WorkflowDef = serde_json::from_value(json!({
      "workflow_id": "sparkify",
      "name": "Sparkify",
      "tasks": [
        { "task_id": "songplays", "type": "load_fact", "conn_id": "redshift",
          "table": "songplays", "select_query": "SELECT * FROM staging_events",
          "depends_on": ["users", "songs"] },
        { "task_id": "users", "type": "load_fact", "conn_id": "redshift",
          "table": "users", "select_query": "SELECT * FROM staging_users" },
        { "task_id": "songs", "type": "load_fact", "conn_id": "redshift",
          "table": "songs", "select_query": "SELECT * FROM staging_songs" }
      ]
    }))
    .unwrap();
    Workflow::from_def(def).unwrap()
  }

  fn executor(hook: Arc<RecordingHook>) -> WorkflowExecutor {
    let mut connections = ConnectionRegistry::new();
    connections.register("redshift", hook).unwrap();
    WorkflowExecutor::new(Arc::new(connections))
  }

  #[tokio::test]
  async fn test_execute_runs_upstream_first() {
    let hook = Arc::new(RecordingHook::default());
    let result = executor(hook.clone())
      .execute(&workflow(), CancellationToken::new())
      .await
      .unwrap();

    assert_eq!(result.task_results.len(), 3);

    let statements = hook.statements();
    assert_eq!(statements.len(), 3);
    assert_eq!(
      statements[2],
      "INSERT INTO songplays\nSELECT * FROM staging_events"
    );
  }

  #[tokio::test]
  async fn test_execute_stops_before_downstream_on_failure() {
    let hook = Arc::new(RecordingHook::failing_on("INSERT INTO users"));
    let err = executor(hook.clone())
      .execute(&workflow(), CancellationToken::new())
      .await
      .unwrap_err();

    match err {
      ExecutionError::TaskExecution {
        task_id,
        source:
          TaskExecutionError::Task {
            source: TaskError::Hook(HookError::Database(_)),
          },
      } => assert_eq!(task_id, "users"),
      other => panic!("unexpected error: {other}"),
    }

    let statements = hook.statements();
    assert!(!statements.iter().any(|s| s.contains("INSERT INTO songplays")));
    assert_eq!(
      statements
        .iter()
        .filter(|s| s.contains("INSERT INTO users"))
        .count(),
      1
    );
  }

  #[tokio::test]
  async fn test_execute_cancelled_before_start() {
    let hook = Arc::new(RecordingHook::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = executor(hook.clone())
      .execute(&workflow(), cancel)
      .await
      .unwrap_err();

    assert!(matches!(err, ExecutionError::Cancelled));
    assert!(hook.statements().is_empty());
  }

  #[tokio::test]
  async fn test_execute_task_ignores_dependencies() {
    let hook = Arc::new(RecordingHook::default());
    let result = executor(hook.clone())
      .execute_task(&workflow(), "songplays", CancellationToken::new())
      .await
      .unwrap();

    assert_eq!(result.task_results.len(), 1);
    assert!(result.task_results.contains_key("songplays"));
    assert_eq!(
      hook.statements(),
      vec!["INSERT INTO songplays\nSELECT * FROM staging_events".to_string()]
    );
  }

  #[tokio::test]
  async fn test_execute_task_unknown_task() {
    let err = executor(Arc::new(RecordingHook::default()))
      .execute_task(&workflow(), "ghost", CancellationToken::new())
      .await
      .unwrap_err();

    assert!(matches!(err, ExecutionError::TaskNotFound(id) if id == "ghost"));
  }
}
