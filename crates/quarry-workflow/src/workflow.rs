use std::collections::{BTreeSet, HashMap};

use quarry_config::WorkflowDef;
use quarry_task::build_task;

use crate::error::WorkflowError;
use crate::graph::Graph;
use crate::node::Node;

/// A validated workflow ready for execution.
#[derive(Debug, Clone)]
pub struct Workflow {
  pub workflow_id: String,
  pub name: String,
  pub nodes: HashMap<String, Node>,
  /// `(upstream, downstream)` pairs.
  pub edges: Vec<(String, String)>,
}

impl Workflow {
  /// Build and validate a workflow from its definition.
  pub fn from_def(def: WorkflowDef) -> Result<Self, WorkflowError> {
    let mut nodes = HashMap::with_capacity(def.tasks.len());
    let mut edges = Vec::new();

    for task_def in &def.tasks {
      if nodes.contains_key(&task_def.task_id) {
        return Err(WorkflowError::DuplicateTask(task_def.task_id.clone()));
      }

      let task = build_task(&task_def.task_type).map_err(|source| WorkflowError::InvalidTask {
        task_id: task_def.task_id.clone(),
        source,
      })?;

      let mut depends_on: Vec<String> = Vec::with_capacity(task_def.depends_on.len());
      for upstream in &task_def.depends_on {
        if !depends_on.contains(upstream) {
          depends_on.push(upstream.clone());
        }
      }

      nodes.insert(
        task_def.task_id.clone(),
        Node {
          task_id: task_def.task_id.clone(),
          config: task_def.task_type.clone(),
          task,
          depends_on,
          timeout_ms: task_def.timeout_ms.or(def.timeout_ms),
        },
      );
    }

    for node in nodes.values() {
      for upstream in &node.depends_on {
        if !nodes.contains_key(upstream) {
          return Err(WorkflowError::InvalidDependency {
            task_id: node.task_id.clone(),
            depends_on: upstream.clone(),
          });
        }
        edges.push((upstream.clone(), node.task_id.clone()));
      }
    }

    let workflow = Self {
      workflow_id: def.workflow_id,
      name: def.name,
      nodes,
      edges,
    };

    workflow.execution_order()?;
    Ok(workflow)
  }

  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.nodes, &self.edges)
  }

  /// Get a node by ID.
  pub fn get_node(&self, task_id: &str) -> Option<&Node> {
    self.nodes.get(task_id)
  }

  /// Task IDs in dependency order.
  pub fn execution_order(&self) -> Result<Vec<String>, WorkflowError> {
    self.graph().topological_order()
  }

  /// Connection IDs referenced by any task, sorted and deduplicated.
  pub fn conn_ids(&self) -> Vec<&str> {
    let ids: BTreeSet<&str> = self
      .nodes
      .values()
      .flat_map(|node| node.config.conn_ids())
      .collect();
    ids.into_iter().collect()
  }
}
