use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::ClientSection;
use crate::enums::LoadingMode;
use crate::error::ConfigError;

/// Default identity of the builtin worker factory.
pub const DEFAULT_WORKER_FACTORY: &str = "channel-worker-factory";
/// Default identity of the builtin client factory.
pub const DEFAULT_CLIENT_FACTORY: &str = "workflow-client-factory";
/// Default identity of the builtin codec chain facade.
pub const DEFAULT_CODEC_CHAIN: &str = "codec-chain";

/// The default converter chain, in specificity order.
pub fn default_converters() -> Vec<String> {
  ["nil-codec", "binary-codec", "open-record-codec", "json-codec"]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Top-level worker process configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
  /// Address of the workflow orchestration backend.
  #[serde(default = "default_address")]
  pub address: String,

  #[serde(default)]
  pub worker: WorkerSection,

  #[serde(default)]
  pub workflow: WorkflowSection,

  /// Deprecated alias for `workflow.client`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow_client: Option<ClientSection>,
}

impl WorkerConfig {
  pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(content)?)
  }

  /// Validate invariants serde cannot express.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.worker.data_converter.converters.is_empty() {
      return Err(ConfigError::NoConverters);
    }
    if self.workflow.client.is_none() && self.workflow_client.is_some() {
      warn!("the top-level 'workflow_client' section is deprecated, use 'workflow.client' instead");
    }
    Ok(())
  }

  /// The client section in effect: `workflow.client`, the deprecated
  /// top-level alias, or defaults.
  pub fn effective_client(&self) -> ClientSection {
    // Precedence mirrors the config tree: the new key wins over the alias.
    if let Some(client) = &self.workflow.client {
      return client.clone();
    }
    if let Some(legacy) = &self.workflow_client {
      return legacy.clone();
    }
    ClientSection::default()
  }
}

impl Default for WorkerConfig {
  fn default() -> Self {
    Self {
      address: default_address(),
      worker: WorkerSection::default(),
      workflow: WorkflowSection::default(),
      workflow_client: None,
    }
  }
}

/// Worker queue, factory binding and converter chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSection {
  #[serde(default = "default_queue")]
  pub queue: String,

  /// Type-or-id of the worker factory.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub factory: Option<String>,

  #[serde(default)]
  pub data_converter: DataConverterSection,
}

impl Default for WorkerSection {
  fn default() -> Self {
    Self {
      queue: default_queue(),
      factory: None,
      data_converter: DataConverterSection::default(),
    }
  }
}

/// The payload converter chain: an ordered list of codec type-or-ids plus
/// the chain facade binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConverterSection {
  #[serde(default = "default_converters")]
  pub converters: Vec<String>,

  /// Type-or-id of the chain facade.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub class: Option<String>,
}

impl Default for DataConverterSection {
  fn default() -> Self {
    Self {
      converters: default_converters(),
      class: None,
    }
  }
}

/// Workflow loading mode and client binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkflowSection {
  #[serde(default)]
  pub loading_mode: LoadingMode,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub client: Option<ClientSection>,
}

fn default_address() -> String {
  "localhost:7233".to_string()
}

fn default_queue() -> String {
  "default".to_string()
}
