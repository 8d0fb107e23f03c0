use std::ffi::OsStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix of environment variables that define connections.
///
/// `QUARRY_CONN_REDSHIFT=postgres://...` defines the connection `redshift`.
pub const CONN_ENV_PREFIX: &str = "QUARRY_CONN_";

/// Database driver used to open a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
  /// PostgreSQL wire protocol (PostgreSQL, Redshift).
  Postgres,
  Sqlite,
}

impl Driver {
  /// Map a URL scheme to a driver.
  pub fn from_scheme(scheme: &str) -> Option<Self> {
    match scheme.to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" | "redshift" => Some(Driver::Postgres),
      "sqlite" => Some(Driver::Sqlite),
      _ => None,
    }
  }
}

/// A named database connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDef {
  pub conn_id: String,
  pub driver: Driver,
  /// Connection URL, including credentials.
  pub url: String,
}

impl ConnectionDef {
  /// Build a connection from a URL, inferring the driver from its scheme.
  ///
  /// `redshift://` URLs are rewritten to `postgres://`.
  pub fn from_url(conn_id: impl Into<String>, url: &str) -> Result<Self, ConfigError> {
    let conn_id = conn_id.into();
    let Some((scheme, rest)) = url.split_once(':') else {
      return Err(ConfigError::MalformedUrl { conn_id });
    };

    let driver = Driver::from_scheme(scheme).ok_or_else(|| ConfigError::UnsupportedScheme {
      conn_id: conn_id.clone(),
      scheme: scheme.to_string(),
    })?;

    let url = if scheme.eq_ignore_ascii_case("redshift") {
      format!("postgres:{}", rest)
    } else {
      url.to_string()
    };

    Ok(Self {
      conn_id,
      driver,
      url,
    })
  }
}

/// Contents of a connections file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsFile {
  #[serde(default)]
  pub connections: Vec<ConnectionDef>,
}

impl ConnectionsFile {
  /// Merge `QUARRY_CONN_<ID>` variables into this file.
  ///
  /// Variables without the prefix are ignored and never decoded. A variable
  /// replaces the file entry whose ID matches case-insensitively, keeping that
  /// entry's ID; otherwise it adds a connection with the ID lowercased.
  pub fn merge_env<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
  {
    for (key, value) in vars {
      let key = key.as_ref();
      if !key.as_encoded_bytes().starts_with(CONN_ENV_PREFIX.as_bytes()) {
        continue;
      }
      let Some(key) = key.to_str() else {
        return Err(ConfigError::NonUnicodeEnv {
          var: key.to_string_lossy().into_owned(),
        });
      };
      let id = &key[CONN_ENV_PREFIX.len()..];
      if id.is_empty() {
        continue;
      }
      let Some(url) = value.as_ref().to_str() else {
        return Err(ConfigError::NonUnicodeEnv {
          var: key.to_string(),
        });
      };

      match self
        .connections
        .iter_mut()
        .find(|c| c.conn_id.eq_ignore_ascii_case(id))
      {
        Some(existing) => *existing = ConnectionDef::from_url(existing.conn_id.clone(), url)?,
        None => self
          .connections
          .push(ConnectionDef::from_url(id.to_ascii_lowercase(), url)?),
      }
    }
    Ok(())
  }
}
