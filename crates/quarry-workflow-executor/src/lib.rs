//! Workflow execution for quarry.
//!
//! This crate provides the [`WorkflowExecutor`] which handles:
//! - Graph traversal and task scheduling
//! - Parallel execution of tasks whose upstream tasks have completed
//! - Fail-fast handling: a failed task stops the workflow before any
//!   downstream task runs

mod error;
mod executor;
mod result;

pub use error::ExecutionError;
pub use executor::WorkflowExecutor;
pub use result::{ExecutionResult, TaskResult};
