//! The component catalog: the explicit set of constructible types.
//!
//! Configuration values may name types "known at composition time"; in Rust
//! that knowledge is an explicit catalog of constructors rather than
//! runtime type lookup. The catalog doubles as the resolver's
//! [`TypeSource`], so static capability conformance is checked against the
//! same declarations the constructors carry.

use std::collections::BTreeMap;
use std::sync::Arc;

use conveyor_codec::{
  BinaryCodec, Codec, CodecChain, DefaultSerializerFactory, JsonCodec, NilCodec, OpenRecordCodec,
  PayloadConverter, RecordCodec, SerializerFactory,
};
use conveyor_config::{DEFAULT_CLIENT_FACTORY, DEFAULT_CODEC_CHAIN, DEFAULT_WORKER_FACTORY};
use conveyor_registry::{CapabilitySet, TypeSource};

use crate::client::{ClientFactory, WorkflowClientFactory};
use crate::error::CatalogError;
use crate::handler::TaskHandler;
use crate::markers;
use crate::worker::{ChannelWorkerFactory, WorkerFactory};

/// A constructed component, one variant per kind the worker composes.
pub enum ComponentInstance {
  Codec(Arc<dyn Codec>),
  Converter(Arc<dyn PayloadConverter>),
  WorkerFactory(Arc<dyn WorkerFactory>),
  ClientFactory(Arc<dyn ClientFactory>),
  Handler(Arc<dyn TaskHandler>),
}

impl ComponentInstance {
  pub fn kind(&self) -> &'static str {
    match self {
      ComponentInstance::Codec(_) => "codec",
      ComponentInstance::Converter(_) => "converter",
      ComponentInstance::WorkerFactory(_) => "worker factory",
      ComponentInstance::ClientFactory(_) => "client factory",
      ComponentInstance::Handler(_) => "task handler",
    }
  }

  pub fn into_codec(self, type_name: &str) -> Result<Arc<dyn Codec>, CatalogError> {
    match self {
      ComponentInstance::Codec(codec) => Ok(codec),
      other => Err(wrong_kind(type_name, "codec", &other)),
    }
  }

  pub fn into_converter(self, type_name: &str) -> Result<Arc<dyn PayloadConverter>, CatalogError> {
    match self {
      ComponentInstance::Converter(converter) => Ok(converter),
      other => Err(wrong_kind(type_name, "converter", &other)),
    }
  }

  pub fn into_worker_factory(
    self,
    type_name: &str,
  ) -> Result<Arc<dyn WorkerFactory>, CatalogError> {
    match self {
      ComponentInstance::WorkerFactory(factory) => Ok(factory),
      other => Err(wrong_kind(type_name, "worker factory", &other)),
    }
  }

  pub fn into_client_factory(
    self,
    type_name: &str,
  ) -> Result<Arc<dyn ClientFactory>, CatalogError> {
    match self {
      ComponentInstance::ClientFactory(factory) => Ok(factory),
      other => Err(wrong_kind(type_name, "client factory", &other)),
    }
  }

  pub fn into_handler(self, type_name: &str) -> Result<Arc<dyn TaskHandler>, CatalogError> {
    match self {
      ComponentInstance::Handler(handler) => Ok(handler),
      other => Err(wrong_kind(type_name, "task handler", &other)),
    }
  }
}

fn wrong_kind(type_name: &str, expected: &'static str, actual: &ComponentInstance) -> CatalogError {
  CatalogError::WrongKind {
    type_name: type_name.to_string(),
    expected,
    actual: actual.kind(),
  }
}

/// What constructors get to work with.
pub struct ConstructorContext {
  /// Resolved codecs, in chain order. Populated when constructing a chain
  /// facade; empty otherwise.
  pub codecs: Vec<Arc<dyn Codec>>,
  /// Factory for record serializers.
  pub serializers: Arc<dyn SerializerFactory>,
}

impl ConstructorContext {
  pub fn new() -> Self {
    Self {
      codecs: Vec::new(),
      serializers: Arc::new(DefaultSerializerFactory),
    }
  }

  pub fn with_codecs(mut self, codecs: Vec<Arc<dyn Codec>>) -> Self {
    self.codecs = codecs;
    self
  }
}

impl Default for ConstructorContext {
  fn default() -> Self {
    Self::new()
  }
}

type Constructor =
  Arc<dyn Fn(&ConstructorContext) -> Result<ComponentInstance, CatalogError> + Send + Sync>;

struct CatalogEntry {
  capabilities: CapabilitySet,
  construct: Constructor,
}

/// Name-keyed constructible component types.
#[derive(Default)]
pub struct ComponentCatalog {
  entries: BTreeMap<String, CatalogEntry>,
}

impl ComponentCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// The catalog with every builtin type registered.
  pub fn builtin() -> Self {
    let mut catalog = Self::new();

    catalog.register(
      "nil-codec",
      CapabilitySet::of(&[markers::PAYLOAD_CODEC]),
      |_| Ok(ComponentInstance::Codec(Arc::new(NilCodec))),
    );
    catalog.register(
      "binary-codec",
      CapabilitySet::of(&[markers::PAYLOAD_CODEC]),
      |_| Ok(ComponentInstance::Codec(Arc::new(BinaryCodec))),
    );
    catalog.register(
      "record-codec",
      CapabilitySet::of(&[markers::PAYLOAD_CODEC]),
      |ctx| {
        Ok(ComponentInstance::Codec(Arc::new(RecordCodec::with_factory(
          ctx.serializers.clone(),
        ))))
      },
    );
    catalog.register(
      "open-record-codec",
      CapabilitySet::of(&[markers::PAYLOAD_CODEC]),
      |ctx| {
        Ok(ComponentInstance::Codec(Arc::new(
          OpenRecordCodec::with_factory(ctx.serializers.clone()),
        )))
      },
    );
    catalog.register(
      "json-codec",
      CapabilitySet::of(&[markers::PAYLOAD_CODEC]),
      |_| Ok(ComponentInstance::Codec(Arc::new(JsonCodec))),
    );
    catalog.register(
      DEFAULT_CODEC_CHAIN,
      CapabilitySet::of(&[markers::CODEC_CHAIN]),
      |ctx| {
        let chain = CodecChain::with_codecs(ctx.codecs.clone()).map_err(|e| {
          CatalogError::Construction {
            type_name: DEFAULT_CODEC_CHAIN.to_string(),
            message: e.to_string(),
          }
        })?;
        Ok(ComponentInstance::Converter(Arc::new(chain)))
      },
    );
    catalog.register(
      DEFAULT_WORKER_FACTORY,
      CapabilitySet::of(&[markers::WORKER_FACTORY]),
      |_| {
        Ok(ComponentInstance::WorkerFactory(Arc::new(
          ChannelWorkerFactory::default(),
        )))
      },
    );
    catalog.register(
      DEFAULT_CLIENT_FACTORY,
      CapabilitySet::of(&[markers::CLIENT_FACTORY]),
      |_| Ok(ComponentInstance::ClientFactory(Arc::new(WorkflowClientFactory))),
    );

    catalog
  }

  /// Register a constructible type. Re-registering a name replaces the
  /// previous entry, so embedders can shadow builtins.
  pub fn register<F>(&mut self, type_name: impl Into<String>, capabilities: CapabilitySet, construct: F)
  where
    F: Fn(&ConstructorContext) -> Result<ComponentInstance, CatalogError> + Send + Sync + 'static,
  {
    self.entries.insert(
      type_name.into(),
      CatalogEntry {
        capabilities,
        construct: Arc::new(construct),
      },
    );
  }

  pub fn contains(&self, type_name: &str) -> bool {
    self.entries.contains_key(type_name)
  }

  /// Construct an instance of a cataloged type.
  ///
  /// This is also where a deferred binding whose type never materialized
  /// fails loudly.
  pub fn construct(
    &self,
    type_name: &str,
    ctx: &ConstructorContext,
  ) -> Result<ComponentInstance, CatalogError> {
    let entry = self
      .entries
      .get(type_name)
      .ok_or_else(|| CatalogError::UnknownType {
        type_name: type_name.to_string(),
      })?;
    (entry.construct)(ctx)
  }
}

impl TypeSource for ComponentCatalog {
  fn capabilities_of(&self, type_name: &str) -> Option<&CapabilitySet> {
    self.entries.get(type_name).map(|entry| &entry.capabilities)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_builtin_types_declare_their_markers() {
    let catalog = ComponentCatalog::builtin();

    for name in ["nil-codec", "binary-codec", "record-codec", "open-record-codec", "json-codec"] {
      let caps = catalog.capabilities_of(name).unwrap();
      assert!(caps.contains(&markers::PAYLOAD_CODEC), "{name}");
    }
    assert!(
      catalog
        .capabilities_of(DEFAULT_WORKER_FACTORY)
        .unwrap()
        .contains(&markers::WORKER_FACTORY)
    );
    assert!(
      catalog
        .capabilities_of(DEFAULT_CLIENT_FACTORY)
        .unwrap()
        .contains(&markers::CLIENT_FACTORY)
    );
  }

  #[test]
  fn test_construct_unknown_type_fails() {
    let catalog = ComponentCatalog::builtin();
    let result = catalog.construct("no-such-type", &ConstructorContext::new());
    assert!(matches!(
      result,
      Err(CatalogError::UnknownType { type_name }) if type_name == "no-such-type"
    ));
  }

  #[test]
  fn test_constructed_codec_reports_its_tag() {
    let catalog = ComponentCatalog::builtin();
    let instance = catalog.construct("json-codec", &ConstructorContext::new()).unwrap();
    let codec = instance.into_codec("json-codec").unwrap();
    assert_eq!(codec.encoding(), "json/plain");
  }

  #[test]
  fn test_into_wrong_kind_is_rejected() {
    let catalog = ComponentCatalog::builtin();
    let instance = catalog.construct("json-codec", &ConstructorContext::new()).unwrap();
    let result = instance.into_worker_factory("json-codec");
    assert!(matches!(result, Err(CatalogError::WrongKind { .. })));
  }

  #[test]
  fn test_chain_facade_constructs_from_context_codecs() {
    let catalog = ComponentCatalog::builtin();
    let ctx = ConstructorContext::new().with_codecs(vec![Arc::new(JsonCodec)]);
    let converter = catalog
      .construct(DEFAULT_CODEC_CHAIN, &ctx)
      .unwrap()
      .into_converter(DEFAULT_CODEC_CHAIN)
      .unwrap();

    let payload = converter
      .encode(&conveyor_codec::WorkValue::Json(serde_json::json!(1)))
      .unwrap();
    assert_eq!(payload.encoding, "json/plain");
  }
}
