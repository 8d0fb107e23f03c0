use async_trait::async_trait;

use crate::error::HookError;

/// Runs SQL statements against one configured connection.
///
/// Implementations decide how connections are acquired and released. Errors
/// from the underlying client are returned as-is; hooks do not retry.
#[async_trait]
pub trait SqlHook: Send + Sync {
  /// Run a single statement and wait for it to complete.
  async fn run(&self, statement: &str) -> Result<(), HookError>;
}
