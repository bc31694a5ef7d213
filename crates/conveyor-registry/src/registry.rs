use std::collections::HashMap;

use crate::definition::ComponentDefinition;
use crate::error::RegistryError;
use crate::marker::CapabilitySet;

/// Where the binding resolver learns whether a name denotes a constructible
/// type, and what that type statically conforms to.
///
/// Implemented by the component catalog; the resolver only ever needs this
/// read view.
pub trait TypeSource {
  fn capabilities_of(&self, type_name: &str) -> Option<&CapabilitySet>;
}

/// Insertion-ordered store of component definitions, keyed by id.
///
/// Definition order is preserved and exposed because it becomes registration
/// order downstream.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
  order: Vec<String>,
  definitions: HashMap<String, ComponentDefinition>,
}

impl ComponentRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a definition. Ids are unique; redefining is an error rather than a
  /// silent overwrite.
  pub fn define(&mut self, definition: ComponentDefinition) -> Result<(), RegistryError> {
    if self.definitions.contains_key(&definition.id) {
      return Err(RegistryError::DuplicateDefinition {
        id: definition.id.clone(),
      });
    }
    self.order.push(definition.id.clone());
    self.definitions.insert(definition.id.clone(), definition);
    Ok(())
  }

  pub fn contains(&self, id: &str) -> bool {
    self.definitions.contains_key(id)
  }

  pub fn get(&self, id: &str) -> Option<&ComponentDefinition> {
    self.definitions.get(id)
  }

  /// All definitions in the order they were defined.
  pub fn definitions(&self) -> impl Iterator<Item = &ComponentDefinition> {
    self.order.iter().filter_map(|id| self.definitions.get(id))
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::marker::Marker;

  const HANDLER: Marker = Marker::new("test.handler");

  fn definition(id: &str) -> ComponentDefinition {
    ComponentDefinition::new(id, id, CapabilitySet::of(&[HANDLER]))
  }

  #[test]
  fn test_define_rejects_duplicate_id() {
    let mut registry = ComponentRegistry::new();
    registry.define(definition("mailer")).unwrap();

    let result = registry.define(definition("mailer"));
    assert!(matches!(
      result,
      Err(RegistryError::DuplicateDefinition { id }) if id == "mailer"
    ));
  }

  #[test]
  fn test_definitions_iterate_in_insertion_order() {
    let mut registry = ComponentRegistry::new();
    registry.define(definition("first")).unwrap();
    registry.define(definition("second")).unwrap();
    registry.define(definition("third")).unwrap();

    let ids: Vec<&str> = registry.definitions().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);

    // Iteration is restartable with the same order.
    let again: Vec<&str> = registry.definitions().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, again);
  }

  #[test]
  fn test_get_returns_definition() {
    let mut registry = ComponentRegistry::new();
    registry.define(definition("mailer")).unwrap();

    assert!(registry.contains("mailer"));
    assert_eq!(registry.get("mailer").unwrap().type_name, "mailer");
    assert!(registry.get("missing").is_none());
  }
}
