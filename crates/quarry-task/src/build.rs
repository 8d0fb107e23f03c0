use std::sync::Arc;

use quarry_config::TaskType;

use crate::error::BuildError;
use crate::load_fact::LoadFactTask;
use crate::types::Task;

/// Build a task from its configuration.
pub fn build_task(task_type: &TaskType) -> Result<Arc<dyn Task>, BuildError> {
  match task_type {
    TaskType::LoadFact {
      conn_id,
      table,
      select_query,
    } => Ok(Arc::new(LoadFactTask::new(
      conn_id.as_str(),
      table.as_str(),
      select_query.as_str(),
    )?)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_build_load_fact() {
    let task = build_task(&TaskType::LoadFact {
      conn_id: "redshift".to_string(),
      table: "songplays".to_string(),
      select_query: "SELECT 1".to_string(),
    })
    .unwrap();

    assert_eq!(task.type_name(), "load_fact");
    assert_eq!(task.display().ui_color, Some("#F98866"));
  }

  #[test]
  fn test_build_rejects_empty_table() {
    let result = build_task(&TaskType::LoadFact {
      conn_id: "redshift".to_string(),
      table: String::new(),
      select_query: "SELECT 1".to_string(),
    });

    assert!(matches!(
      result,
      Err(BuildError::MissingParameter { field: "table" })
    ));
  }
}
