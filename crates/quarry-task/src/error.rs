use quarry_hook::HookError;
use thiserror::Error;

/// Errors returned by [`Task::execute`](crate::Task::execute).
#[derive(Debug, Error)]
pub enum TaskError {
  /// The hook failed to resolve or to run the statement.
  #[error(transparent)]
  Hook(#[from] HookError),
}

/// Errors raised while constructing a task from its configuration.
#[derive(Debug, Error)]
pub enum BuildError {
  /// A required parameter is empty.
  #[error("missing required parameter: {field}")]
  MissingParameter { field: &'static str },
}
