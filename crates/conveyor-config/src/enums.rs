use serde::{Deserialize, Serialize};

/// Where workflow definition identities come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadingMode {
  /// A declarative list in `workflows.json` under the config directory.
  #[default]
  File,
  /// Definitions carried by the component registry.
  Container,
}
