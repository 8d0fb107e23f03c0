//! Task execution for quarry workflows.
//!
//! This crate provides the [`TaskExecutor`] which runs a single built task
//! with its execution context, under a tracing span, bounded by an optional
//! timeout and a cancellation token.

mod error;
mod executor;
mod result;

pub use error::TaskExecutionError;
pub use executor::{TaskExecutor, TaskInput};
pub use result::TaskResult;
