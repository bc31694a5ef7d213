//! The declarative workflow list.
//!
//! In file loading mode, workflow definition identities come from a JSON
//! file at a conventional path under the config directory. A missing file
//! means no workflows; a file with anything other than a list of identity
//! strings is a fatal configuration error, never a silently empty registry.

use std::path::Path;

use serde_json::Value;

use crate::error::WorkflowFileError;

/// Conventional file name under the config directory.
pub const WORKFLOWS_FILE: &str = "workflows.json";

/// Load workflow identities from `<config_dir>/workflows.json`.
pub fn load_workflow_file(config_dir: &Path) -> Result<Vec<String>, WorkflowFileError> {
  let path = config_dir.join(WORKFLOWS_FILE);
  if !path.exists() {
    return Ok(Vec::new());
  }

  let content = std::fs::read_to_string(&path).map_err(|source| WorkflowFileError::Io {
    path: path.clone(),
    source,
  })?;
  let value: Value =
    serde_json::from_str(&content).map_err(|source| WorkflowFileError::Parse {
      path: path.clone(),
      source,
    })?;

  let Value::Array(items) = value else {
    return Err(WorkflowFileError::NotAList { path });
  };

  items
    .into_iter()
    .map(|item| match item {
      Value::String(identity) => Ok(identity),
      _ => Err(WorkflowFileError::NotAList { path: path.clone() }),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_workflows(dir: &tempfile::TempDir, content: &str) {
    std::fs::write(dir.path().join(WORKFLOWS_FILE), content).unwrap();
  }

  #[test]
  fn test_missing_file_means_no_workflows() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(load_workflow_file(dir.path()).unwrap(), Vec::<String>::new());
  }

  #[test]
  fn test_loads_identity_list() {
    let dir = tempfile::tempdir().unwrap();
    write_workflows(&dir, r#"["app.billing_workflow", "app.audit_workflow"]"#);

    let identities = load_workflow_file(dir.path()).unwrap();
    assert_eq!(identities, vec!["app.billing_workflow", "app.audit_workflow"]);
  }

  #[test]
  fn test_non_list_document_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_workflows(&dir, r#"{"workflows": []}"#);

    let result = load_workflow_file(dir.path());
    assert!(matches!(result, Err(WorkflowFileError::NotAList { .. })));
  }

  #[test]
  fn test_non_string_entry_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_workflows(&dir, r#"["app.billing_workflow", 42]"#);

    let result = load_workflow_file(dir.path());
    assert!(matches!(result, Err(WorkflowFileError::NotAList { .. })));
  }

  #[test]
  fn test_invalid_json_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write_workflows(&dir, "not json at all");

    let result = load_workflow_file(dir.path());
    assert!(matches!(result, Err(WorkflowFileError::Parse { .. })));
  }
}
