//! Tasks for Quarry workflows.
//!
//! A task is anything that implements the [`Task`] capability interface: the
//! host invokes [`Task::execute`] once per scheduled run and may read
//! [`Task::display`] for UI metadata. Built-in task types are constructed from
//! their configuration with [`build_task`].

mod build;
mod error;
mod load_fact;
mod types;

pub use build::build_task;
pub use error::{BuildError, TaskError};
pub use load_fact::LoadFactTask;
pub use types::{DisplayMeta, Task, TaskContext};
