use thiserror::Error;

/// Errors raised while assembling configuration from its sources.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The connection URL scheme does not map to a known driver.
  #[error("connection '{conn_id}' uses unsupported scheme '{scheme}'")]
  UnsupportedScheme { conn_id: String, scheme: String },

  /// The connection URL has no scheme at all.
  #[error("connection '{conn_id}' has a malformed url")]
  MalformedUrl { conn_id: String },

  /// A `QUARRY_CONN_*` variable name or value is not valid UTF-8.
  #[error("environment variable '{var}' is not valid unicode")]
  NonUnicodeEnv { var: String },
}
