//! Registry error types.

use crate::marker::Marker;

/// Errors from the component registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
  /// A definition with this id already exists.
  #[error("component '{id}' is already defined")]
  DuplicateDefinition { id: String },
}

/// Errors from service-registry admission.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
  /// The candidate does not declare the registry's required marker.
  #[error("component '{type_name}' does not declare required capability marker '{marker}'")]
  MissingCapabilityMarker { type_name: String, marker: Marker },
}
