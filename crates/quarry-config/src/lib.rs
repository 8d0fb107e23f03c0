//! Quarry Config
//!
//! This crate contains the serializable configuration types for Quarry.
//! These types represent workflow and connection definitions before they are
//! validated and built into runtime structures.
//!
//! Configuration is loaded from:
//! - JSON workflow files (via CLI with `quarry run workflow sparkify.json`)
//! - A JSON connections file (default `~/.quarry/connections.json`)
//! - `QUARRY_CONN_<ID>` environment variables, which override file entries

mod connection;
mod error;
mod task;
mod workflow;

pub use connection::{CONN_ENV_PREFIX, ConnectionDef, ConnectionsFile, Driver};
pub use error::ConfigError;
pub use task::{TaskDef, TaskType};
pub use workflow::WorkflowDef;
