use std::collections::HashMap;
use std::sync::Arc;

use quarry_config::{ConnectionDef, Driver};

use crate::error::HookError;
use crate::hook::SqlHook;
use crate::postgres::PostgresHook;
use crate::sqlite::SqliteHook;

/// Build the hook for a connection definition.
pub fn hook_for(def: &ConnectionDef) -> Arc<dyn SqlHook> {
  match def.driver {
    Driver::Postgres => Arc::new(PostgresHook::new(&def.conn_id, &def.url)),
    Driver::Sqlite => Arc::new(SqliteHook::new(&def.conn_id, &def.url)),
  }
}

/// Registry of hooks (conn_id -> hook).
///
/// Built during initialization, then shared read-only (behind an `Arc`) by
/// every task execution. The registry owns the hooks; tasks resolve one per
/// call and drop it when done.
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
  hooks: HashMap<String, Arc<dyn SqlHook>>,
}

impl ConnectionRegistry {
  pub fn new() -> Self {
    Self {
      hooks: HashMap::new(),
    }
  }

  /// Build a registry from connection definitions.
  pub fn from_defs<'a>(
    defs: impl IntoIterator<Item = &'a ConnectionDef>,
  ) -> Result<Self, HookError> {
    let mut registry = Self::new();
    for def in defs {
      registry.register(def.conn_id.clone(), hook_for(def))?;
    }
    Ok(registry)
  }

  /// Register a hook under a connection ID.
  pub fn register(
    &mut self,
    conn_id: impl Into<String>,
    hook: Arc<dyn SqlHook>,
  ) -> Result<(), HookError> {
    let conn_id = conn_id.into();
    if self.hooks.contains_key(&conn_id) {
      return Err(HookError::DuplicateConnection(conn_id));
    }
    self.hooks.insert(conn_id, hook);
    Ok(())
  }

  /// Look up the hook for a connection ID.
  pub fn resolve(&self, conn_id: &str) -> Result<Arc<dyn SqlHook>, HookError> {
    self
      .hooks
      .get(conn_id)
      .cloned()
      .ok_or_else(|| HookError::ConnectionNotFound(conn_id.to_string()))
  }

  pub fn contains(&self, conn_id: &str) -> bool {
    self.hooks.contains_key(conn_id)
  }

  /// Registered connection IDs, sorted.
  pub fn conn_ids(&self) -> Vec<&str> {
    let mut ids: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
    ids.sort_unstable();
    ids
  }

  pub fn len(&self) -> usize {
    self.hooks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.hooks.is_empty()
  }
}
