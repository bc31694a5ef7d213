use async_trait::async_trait;
use conveyor_codec::{TargetType, WorkValue};
use conveyor_registry::Capable;

use crate::error::HandlerError;

/// A task handler: the unit of work the dispatch loop invokes.
///
/// Handlers are admitted into the task registry only if their declared
/// capability set carries the task-handler marker; the `Capable` supertrait
/// is where they declare it.
#[async_trait]
pub trait TaskHandler: Capable + Send + Sync {
  /// The task identity this handler answers to. Dispatch matches incoming
  /// work items against this, in registration order.
  fn identity(&self) -> &str;

  /// The shape this handler wants its input decoded into.
  fn input_type(&self) -> TargetType;

  /// Process one decoded work item.
  async fn handle(&self, input: WorkValue) -> Result<WorkValue, HandlerError>;
}
