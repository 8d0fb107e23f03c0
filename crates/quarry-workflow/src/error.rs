use quarry_task::BuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("task not found: {0}")]
  TaskNotFound(String),

  #[error("duplicate task id: {0}")]
  DuplicateTask(String),

  #[error("task '{task_id}' depends on unknown task '{depends_on}'")]
  InvalidDependency { task_id: String, depends_on: String },

  #[error("dependency cycle involving tasks: {0:?}")]
  Cycle(Vec<String>),

  #[error("invalid task '{task_id}': {source}")]
  InvalidTask {
    task_id: String,
    #[source]
    source: BuildError,
  },
}
