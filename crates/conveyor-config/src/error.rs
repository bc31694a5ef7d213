//! Configuration error types.

/// Errors from parsing or validating worker configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to parse configuration: {0}")]
  Parse(#[from] serde_json::Error),

  /// The converter chain would be empty; a worker cannot encode anything.
  #[error("worker.data_converter.converters requires at least one converter")]
  NoConverters,
}
