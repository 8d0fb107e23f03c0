//! Quarry Workflow
//!
//! This crate provides the validated workflow representation for Quarry.
//! A workflow is built from a [`WorkflowDef`](quarry_config::WorkflowDef) and
//! is ready for execution.
//!
//! Key differences from `quarry-config`:
//! - Every task is constructed, so parameter errors surface at load time
//! - Dependencies are checked (known task IDs, no cycles)
//! - Timeouts are resolved (task value, else workflow default)

mod error;
mod graph;
mod node;
mod workflow;

pub use error::WorkflowError;
pub use graph::Graph;
pub use node::Node;
pub use workflow::Workflow;
