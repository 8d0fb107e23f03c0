use thiserror::Error;

/// Errors raised by hooks and the connection registry.
#[derive(Debug, Error)]
pub enum HookError {
  /// No hook is registered under the connection ID.
  #[error("connection not found: {0}")]
  ConnectionNotFound(String),

  /// A hook is already registered under the connection ID.
  #[error("duplicate connection: {0}")]
  DuplicateConnection(String),

  /// The database client failed to connect or to run the statement.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}
