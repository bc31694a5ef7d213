use std::sync::Arc;

use crate::error::AdmissionError;
use crate::marker::{CapabilitySet, Marker};

/// A live component that can state its type and declared capabilities.
pub trait Capable {
  /// Name of the concrete type, for error reporting.
  fn type_name(&self) -> &str;

  /// The capability set this component declares.
  fn capabilities(&self) -> CapabilitySet;
}

impl<T: Capable + ?Sized> Capable for Arc<T> {
  fn type_name(&self) -> &str {
    (**self).type_name()
  }

  fn capabilities(&self) -> CapabilitySet {
    (**self).capabilities()
  }
}

/// An ordered registry of admitted components of one kind.
///
/// Admission validates the candidate's capability set against the required
/// marker; capabilities are checked here and never again. Admission order is
/// preserved because it becomes dispatch-priority order downstream.
#[derive(Debug)]
pub struct ServiceRegistry<T> {
  required: Marker,
  entries: Vec<T>,
}

impl<T: Capable> ServiceRegistry<T> {
  pub fn new(required: Marker) -> Self {
    Self {
      required,
      entries: Vec::new(),
    }
  }

  /// The marker every admitted component must declare.
  pub fn required(&self) -> Marker {
    self.required
  }

  /// Validate and append a candidate.
  ///
  /// The check walks the candidate's full capability set, so a marker
  /// reachable through several declaration paths is a single satisfied
  /// requirement.
  pub fn admit(&mut self, candidate: T) -> Result<(), AdmissionError> {
    if !candidate.capabilities().contains(&self.required) {
      return Err(AdmissionError::MissingCapabilityMarker {
        type_name: candidate.type_name().to_string(),
        marker: self.required,
      });
    }
    self.entries.push(candidate);
    Ok(())
  }

  /// Admitted components in admission order. Iteration is restartable and
  /// always yields the same order.
  pub fn all(&self) -> &[T] {
    &self.entries
  }

  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const HANDLER: Marker = Marker::new("test.handler");
  const METRICS: Marker = Marker::new("test.metrics");

  struct Candidate {
    name: &'static str,
    capabilities: CapabilitySet,
  }

  impl Capable for Candidate {
    fn type_name(&self) -> &str {
      self.name
    }

    fn capabilities(&self) -> CapabilitySet {
      self.capabilities.clone()
    }
  }

  #[test]
  fn test_admit_preserves_insertion_order() {
    let mut registry = ServiceRegistry::new(HANDLER);
    for name in ["alpha", "beta", "gamma"] {
      registry
        .admit(Candidate {
          name,
          capabilities: CapabilitySet::of(&[HANDLER]),
        })
        .unwrap();
    }

    let names: Vec<&str> = registry.iter().map(|c| c.type_name()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);

    let again: Vec<&str> = registry.iter().map(|c| c.type_name()).collect();
    assert_eq!(names, again);
  }

  #[test]
  fn test_admit_rejects_candidate_without_marker() {
    let mut registry = ServiceRegistry::new(HANDLER);
    let result = registry.admit(Candidate {
      name: "metrics-only",
      capabilities: CapabilitySet::of(&[METRICS]),
    });

    assert!(matches!(
      result,
      Err(AdmissionError::MissingCapabilityMarker { type_name, marker })
        if type_name == "metrics-only" && marker == HANDLER
    ));
    assert!(registry.all().is_empty());
  }

  #[test]
  fn test_marker_declared_on_multiple_paths_is_admitted_once() {
    let mut registry = ServiceRegistry::new(HANDLER);
    // Declared directly and again through an inherited capability set.
    let capabilities =
      CapabilitySet::of(&[HANDLER]).with_set(CapabilitySet::of(&[HANDLER, METRICS]));

    registry
      .admit(Candidate {
        name: "doubly-declared",
        capabilities,
      })
      .unwrap();
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn test_admit_through_arc() {
    let mut registry: ServiceRegistry<Arc<Candidate>> = ServiceRegistry::new(HANDLER);
    registry
      .admit(Arc::new(Candidate {
        name: "shared",
        capabilities: CapabilitySet::of(&[HANDLER]),
      }))
      .unwrap();
    assert_eq!(registry.all()[0].type_name(), "shared");
  }
}
