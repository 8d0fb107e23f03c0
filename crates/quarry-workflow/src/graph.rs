use std::collections::{BTreeSet, HashMap};

use crate::Node;
use crate::error::WorkflowError;

/// Graph structure for traversal and analysis.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: task_id -> list of downstream task_ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: task_id -> list of upstream task_ids.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Tasks with no incoming edges, sorted.
  entry_points: Vec<String>,
}

impl Graph {
  /// Build a graph from nodes and `(upstream, downstream)` edges.
  pub fn new(nodes: &HashMap<String, Node>, edges: &[(String, String)]) -> Self {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for task_id in nodes.keys() {
      adjacency.entry(task_id.clone()).or_default();
      reverse_adjacency.entry(task_id.clone()).or_default();
    }

    for (from, to) in edges {
      adjacency.entry(from.clone()).or_default().push(to.clone());
      reverse_adjacency
        .entry(to.clone())
        .or_default()
        .push(from.clone());
    }

    let mut entry_points: Vec<String> = nodes
      .keys()
      .filter(|id| reverse_adjacency.get(*id).is_none_or(|v| v.is_empty()))
      .cloned()
      .collect();
    entry_points.sort();

    Self {
      adjacency,
      reverse_adjacency,
      entry_points,
    }
  }

  /// Get entry points (tasks with no incoming edges).
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Get downstream tasks for a given task.
  pub fn downstream(&self, task_id: &str) -> &[String] {
    self
      .adjacency
      .get(task_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream tasks for a given task.
  pub fn upstream(&self, task_id: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(task_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Order tasks so every task follows its upstream tasks.
  ///
  /// Ties are broken by task ID, so the order is stable across runs. Fails
  /// with the tasks that could not be ordered when the graph has a cycle.
  pub fn topological_order(&self) -> Result<Vec<String>, WorkflowError> {
    let mut remaining: HashMap<&str, usize> = self
      .reverse_adjacency
      .iter()
      .map(|(id, upstream)| (id.as_str(), upstream.len()))
      .collect();
    let mut ready: BTreeSet<&str> = self.entry_points.iter().map(String::as_str).collect();
    let mut order = Vec::with_capacity(remaining.len());

    while let Some(task_id) = ready.pop_first() {
      remaining.remove(task_id);
      order.push(task_id.to_string());

      for next in self.downstream(task_id) {
        if let Some(count) = remaining.get_mut(next.as_str()) {
          *count -= 1;
          if *count == 0 {
            ready.insert(next.as_str());
          }
        }
      }
    }

    if !remaining.is_empty() {
      let mut stuck: Vec<String> = remaining.keys().map(|id| id.to_string()).collect();
      stuck.sort();
      return Err(WorkflowError::Cycle(stuck));
    }

    Ok(order)
  }
}
