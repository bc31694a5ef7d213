//! The client factory seam and the composed client handle.
//!
//! Transport to the orchestration backend is not this crate's concern; the
//! factory's product is the fully composed handle (address, options, payload
//! converter) an embedder hands to whatever transport it uses.

use std::fmt;
use std::sync::Arc;

use conveyor_codec::PayloadConverter;
use conveyor_config::{ClientOptionsConfig, QueryRejectCondition};

/// Everything a client factory needs: resolved address, options and the
/// payload converter the chain produced.
pub struct ClientConfig {
  pub address: String,
  pub options: ClientOptionsConfig,
  pub converter: Arc<dyn PayloadConverter>,
}

/// Builds the workflow client handle.
pub trait ClientFactory: Send + Sync {
  fn create(&self, config: &ClientConfig) -> WorkflowClient;
}

/// The composed client handle.
pub struct WorkflowClient {
  pub address: String,
  pub namespace: String,
  pub identity: Option<String>,
  pub query_rejection_condition: QueryRejectCondition,
  converter: Arc<dyn PayloadConverter>,
}

impl WorkflowClient {
  pub fn new(
    address: impl Into<String>,
    namespace: impl Into<String>,
    identity: Option<String>,
    query_rejection_condition: QueryRejectCondition,
    converter: Arc<dyn PayloadConverter>,
  ) -> Self {
    Self {
      address: address.into(),
      namespace: namespace.into(),
      identity,
      query_rejection_condition,
      converter,
    }
  }

  /// The payload converter this client shares with the worker.
  pub fn converter(&self) -> &Arc<dyn PayloadConverter> {
    &self.converter
  }
}

impl fmt::Debug for WorkflowClient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WorkflowClient")
      .field("address", &self.address)
      .field("namespace", &self.namespace)
      .field("identity", &self.identity)
      .field("query_rejection_condition", &self.query_rejection_condition)
      .finish_non_exhaustive()
  }
}

/// The builtin client factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowClientFactory;

impl ClientFactory for WorkflowClientFactory {
  fn create(&self, config: &ClientConfig) -> WorkflowClient {
    // "Unspecified" carries no behavior of its own; normalize it away so
    // downstream code only sees meaningful conditions.
    let rejection = match config.options.query_rejection_condition {
      QueryRejectCondition::Unspecified => QueryRejectCondition::None,
      other => other,
    };

    WorkflowClient::new(
      config.address.clone(),
      config.options.namespace.clone(),
      config.options.identity.clone(),
      rejection,
      config.converter.clone(),
    )
  }
}
