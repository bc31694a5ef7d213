//! Worker error types.

use std::path::PathBuf;

use conveyor_codec::CodecError;
use conveyor_config::ConfigError;
use conveyor_registry::AdmissionError;
use conveyor_resolver::ResolveError;

/// Errors from the component catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  /// The name does not denote a constructible type.
  #[error("type '{type_name}' is not a constructible component type")]
  UnknownType { type_name: String },

  /// The type constructed, but as a different kind of component than the
  /// binding requires.
  #[error("component '{type_name}' constructed as {actual}, expected {expected}")]
  WrongKind {
    type_name: String,
    expected: &'static str,
    actual: &'static str,
  },

  #[error("failed to construct component '{type_name}': {message}")]
  Construction { type_name: String, message: String },
}

/// Errors loading the declarative workflow list.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowFileError {
  #[error("failed to read workflow file {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("workflow file {} is not valid JSON: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// The file parsed, but does not contain a list of identity strings.
  #[error("workflow file {} must contain a list of workflow identities", path.display())]
  NotAList { path: PathBuf },
}

/// A task handler failure, surfaced per work item.
#[derive(Debug, thiserror::Error)]
#[error("task '{task}' failed: {message}")]
pub struct HandlerError {
  pub task: String,
  pub message: String,
}

impl HandlerError {
  pub fn new(task: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      task: task.into(),
      message: message.into(),
    }
  }
}

/// Errors dispatching a single work item. Replied to the item's sender; the
/// loop itself keeps running.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
  #[error("no handler registered for task '{task}'")]
  UnknownTask { task: String },

  #[error(transparent)]
  Codec(#[from] CodecError),

  #[error(transparent)]
  Handler(#[from] HandlerError),
}

/// A worker runtime failure that ends the dispatch loop.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
  #[error("worker runtime failed: {message}")]
  Runtime { message: String },
}

/// Errors aborting worker bootstrap. All of these are raised at composition
/// time; no partial worker is ever started.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error(transparent)]
  Codec(#[from] CodecError),

  #[error(transparent)]
  Admission(#[from] AdmissionError),

  #[error(transparent)]
  WorkflowFile(#[from] WorkflowFileError),

  #[error(transparent)]
  Worker(#[from] WorkerError),
}
