use conveyor_registry::{CapabilitySet, ComponentDefinition, ComponentRegistry, Marker, TypeSource};

use crate::error::ResolveError;

/// The classified form of a configured component value.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
  /// The value names a constructible type; a definition was registered but
  /// the instance is built later by the composition root.
  Literal { type_name: String },

  /// The value names a component already present in the registry.
  Registered { id: String, type_name: String },
}

impl Binding {
  /// The type the composition root should construct for this binding.
  pub fn type_name(&self) -> &str {
    match self {
      Binding::Literal { type_name } => type_name,
      Binding::Registered { type_name, .. } => type_name,
    }
  }
}

/// Classifies configuration values against a type catalog and the component
/// registry.
///
/// The resolver never instantiates anything. Its only side effect is
/// defining literal components in the registry so the composition root can
/// construct them during its normal lifecycle. Registry state is checked
/// before the catalog, so the registered-id versus literal-type ambiguity of
/// a bare string resolves the same way every time.
pub struct BindingResolver<'a, S: TypeSource> {
  types: &'a S,
  registry: &'a mut ComponentRegistry,
}

impl<'a, S: TypeSource> BindingResolver<'a, S> {
  pub fn new(types: &'a S, registry: &'a mut ComponentRegistry) -> Self {
    Self { types, registry }
  }

  /// Resolve a configured value into a binding.
  ///
  /// An absent value falls back to `default_identity`. A value that is
  /// neither registered nor constructible is an error unless
  /// `allow_on_the_fly` is set, in which case it is defined as a deferred
  /// component to be constructed later — conformance is then re-checked at
  /// instantiation time, since there is no type to inspect yet.
  pub fn resolve(
    &mut self,
    configured: Option<&str>,
    required: Marker,
    default_identity: &str,
    allow_on_the_fly: bool,
  ) -> Result<Binding, ResolveError> {
    let value = configured.unwrap_or(default_identity);

    if let Some(definition) = self.registry.get(value) {
      if definition.capabilities.contains(&required) {
        return Ok(Binding::Registered {
          id: value.to_string(),
          type_name: definition.type_name.clone(),
        });
      }
      return Err(ResolveError::CapabilityMismatch {
        value: value.to_string(),
        type_name: definition.type_name.clone(),
        required,
        attempted_default: default_identity.to_string(),
      });
    }

    if let Some(capabilities) = self.types.capabilities_of(value) {
      // Static conformance check against the catalog's declared set; the
      // type is not instantiated here.
      if !capabilities.contains(&required) {
        return Err(ResolveError::CapabilityMismatch {
          value: value.to_string(),
          type_name: value.to_string(),
          required,
          attempted_default: default_identity.to_string(),
        });
      }
      let capabilities = capabilities.clone();
      self
        .registry
        .define(ComponentDefinition::new(value, value, capabilities))?;
      return Ok(Binding::Literal {
        type_name: value.to_string(),
      });
    }

    if allow_on_the_fly {
      self
        .registry
        .define(ComponentDefinition::new(value, value, CapabilitySet::new()))?;
      return Ok(Binding::Literal {
        type_name: value.to_string(),
      });
    }

    Err(ResolveError::Unresolvable {
      value: value.to_string(),
      required,
      attempted_default: default_identity.to_string(),
    })
  }
}
