//! Resolver error types.

use conveyor_registry::{Marker, RegistryError};

/// Errors from binding resolution.
///
/// Both shapes are startup-time misconfigurations an operator must fix, so
/// every message carries the offending value, the required capability and
/// the default that was in play.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
  /// The value resolved to a component, but that component does not satisfy
  /// the required capability.
  #[error(
    "binding '{value}' resolves to type '{type_name}' which does not satisfy required capability '{required}' (default candidate was '{attempted_default}')"
  )]
  CapabilityMismatch {
    value: String,
    type_name: String,
    required: Marker,
    attempted_default: String,
  },

  /// The value is neither a constructible type nor a registered component.
  #[error(
    "binding '{value}' is neither a constructible type nor a registered component satisfying capability '{required}' (default candidate was '{attempted_default}')"
  )]
  Unresolvable {
    value: String,
    required: Marker,
    attempted_default: String,
  },

  #[error(transparent)]
  Registry(#[from] RegistryError),
}
