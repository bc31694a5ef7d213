use serde::{Deserialize, Serialize};

/// Client factory binding plus the options handed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClientSection {
  #[serde(default)]
  pub options: ClientOptionsConfig,

  /// Type-or-id of the client factory.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub factory: Option<String>,
}

/// Options for the workflow client handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOptionsConfig {
  #[serde(default = "default_namespace")]
  pub namespace: String,

  /// Client identity, e.g. "pid@host".
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub identity: Option<String>,

  #[serde(default)]
  pub query_rejection_condition: QueryRejectCondition,
}

impl Default for ClientOptionsConfig {
  fn default() -> Self {
    Self {
      namespace: default_namespace(),
      identity: None,
      query_rejection_condition: QueryRejectCondition::default(),
    }
  }
}

fn default_namespace() -> String {
  "default".to_string()
}

/// When the client should reject queries against a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryRejectCondition {
  #[default]
  None,
  Unspecified,
  NotOpen,
  NotCompletedCleanly,
}
