use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use quarry_hook::ConnectionRegistry;

use crate::error::TaskError;

/// Context provided to a task during execution.
#[derive(Clone)]
pub struct TaskContext {
  /// Workflow execution ID.
  pub execution_id: String,

  /// Task ID within the workflow.
  pub task_id: String,

  /// Connections the task may resolve hooks from.
  pub connections: Arc<ConnectionRegistry>,
}

/// Cosmetic metadata a host may use when displaying a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayMeta {
  /// Background color, e.g. `#F98866`.
  pub ui_color: Option<&'static str>,
  /// Foreground (text) color.
  pub ui_fgcolor: Option<&'static str>,
}

/// A unit of work the host can run.
///
/// Tasks are immutable once built and hold no state between runs, so one
/// instance may be executed any number of times, including concurrently.
#[async_trait]
pub trait Task: Send + Sync + fmt::Debug {
  /// The registered type name, matching the `type` tag in workflow files.
  fn type_name(&self) -> &'static str;

  /// Display metadata. Defaults to none.
  fn display(&self) -> DisplayMeta {
    DisplayMeta::default()
  }

  /// Preview of the work one run performs, for dry runs. Defaults to none.
  fn render(&self) -> Option<String> {
    None
  }

  /// Run the task once.
  async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError>;
}
