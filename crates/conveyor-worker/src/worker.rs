//! The worker seam and the builtin channel-backed worker.
//!
//! A `Worker` owns the blocking dispatch loop: hand it a queue identity and
//! registered handlers, then it runs until cancelled. The builtin
//! [`ChannelWorker`] receives work items over an mpsc channel and replies
//! per item over a oneshot.

use std::sync::Arc;

use async_trait::async_trait;
use conveyor_codec::{Payload, PayloadConverter};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::{DispatchError, WorkerError};
use crate::handler::TaskHandler;

/// Creates workers bound to a queue and a payload converter.
pub trait WorkerFactory: Send + Sync {
  fn new_worker(&self, queue: &str, converter: Arc<dyn PayloadConverter>) -> Box<dyn Worker>;
}

/// A worker: registered workflows and handlers plus the dispatch loop.
#[async_trait]
pub trait Worker: Send + Sync {
  /// Record a workflow definition identity with this worker.
  fn register_workflow(&mut self, identity: &str);

  /// Register a task handler. Registration order is dispatch-priority order.
  fn register_task(&mut self, handler: Arc<dyn TaskHandler>);

  /// Block dispatching work until told to stop.
  async fn run(self: Box<Self>, cancel: CancellationToken) -> Result<(), WorkerError>;
}

/// One unit of incoming work.
#[derive(Debug)]
pub struct WorkItem {
  /// Task identity to dispatch on.
  pub task: String,
  /// The encoded input payload.
  pub payload: Payload,
  /// Where the encoded result (or the per-item error) goes.
  pub reply: oneshot::Sender<Result<Payload, DispatchError>>,
}

/// Builds [`ChannelWorker`]s.
#[derive(Debug, Clone, Copy)]
pub struct ChannelWorkerFactory {
  buffer: usize,
}

impl ChannelWorkerFactory {
  pub fn new(buffer: usize) -> Self {
    Self { buffer }
  }

  /// Build the concrete worker, keeping access to its sender handle.
  pub fn new_channel_worker(
    &self,
    queue: &str,
    converter: Arc<dyn PayloadConverter>,
  ) -> ChannelWorker {
    ChannelWorker::new(queue, converter, self.buffer)
  }
}

impl Default for ChannelWorkerFactory {
  fn default() -> Self {
    Self::new(100)
  }
}

impl WorkerFactory for ChannelWorkerFactory {
  fn new_worker(&self, queue: &str, converter: Arc<dyn PayloadConverter>) -> Box<dyn Worker> {
    Box::new(self.new_channel_worker(queue, converter))
  }
}

/// The builtin worker: an mpsc work-item channel drained until cancellation.
pub struct ChannelWorker {
  queue: String,
  converter: Arc<dyn PayloadConverter>,
  workflows: Vec<String>,
  handlers: Vec<Arc<dyn TaskHandler>>,
  sender: mpsc::Sender<WorkItem>,
  receiver: mpsc::Receiver<WorkItem>,
}

impl ChannelWorker {
  fn new(queue: &str, converter: Arc<dyn PayloadConverter>, buffer: usize) -> Self {
    let (sender, receiver) = mpsc::channel(buffer);
    Self {
      queue: queue.to_string(),
      converter,
      workflows: Vec::new(),
      handlers: Vec::new(),
      sender,
      receiver,
    }
  }

  /// A handle for feeding work items into this worker's loop.
  pub fn sender(&self) -> mpsc::Sender<WorkItem> {
    self.sender.clone()
  }

  /// Workflow identities registered so far.
  pub fn workflows(&self) -> &[String] {
    &self.workflows
  }

  #[instrument(name = "dispatch", skip(self, payload), fields(queue = %self.queue))]
  async fn dispatch(&self, task: &str, payload: Payload) -> Result<Payload, DispatchError> {
    let handler = self
      .handlers
      .iter()
      .find(|h| h.identity() == task)
      .ok_or_else(|| DispatchError::UnknownTask {
        task: task.to_string(),
      })?;

    let input = self.converter.decode(&payload, &handler.input_type())?;
    let output = handler.handle(input).await?;
    Ok(self.converter.encode(&output)?)
  }
}

#[async_trait]
impl Worker for ChannelWorker {
  fn register_workflow(&mut self, identity: &str) {
    debug!(queue = %self.queue, workflow = %identity, "workflow registered");
    self.workflows.push(identity.to_string());
  }

  fn register_task(&mut self, handler: Arc<dyn TaskHandler>) {
    debug!(queue = %self.queue, task = %handler.identity(), "task handler registered");
    self.handlers.push(handler);
  }

  async fn run(mut self: Box<Self>, cancel: CancellationToken) -> Result<(), WorkerError> {
    info!(
      queue = %self.queue,
      workflows = self.workflows.len(),
      tasks = self.handlers.len(),
      "worker loop started"
    );

    loop {
      tokio::select! {
        _ = cancel.cancelled() => {
          info!(queue = %self.queue, "worker loop cancelled");
          break;
        }
        item = self.receiver.recv() => {
          match item {
            Some(WorkItem { task, payload, reply }) => {
              let result = self.dispatch(&task, payload).await;
              if let Err(e) = &result {
                warn!(queue = %self.queue, task = %task, error = %e, "work item failed");
              }
              // The requester may have gone away; that is its problem.
              let _ = reply.send(result);
            }
            None => {
              info!(queue = %self.queue, "work channel closed");
              break;
            }
          }
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::HandlerError;
  use crate::markers;
  use conveyor_codec::{
    BinaryCodec, CodecChain, JsonCodec, NilCodec, OpenRecordCodec, TargetType, WorkValue,
  };
  use conveyor_registry::{Capable, CapabilitySet};
  use serde_json::json;

  struct EchoHandler;

  impl Capable for EchoHandler {
    fn type_name(&self) -> &str {
      "echo-handler"
    }

    fn capabilities(&self) -> CapabilitySet {
      CapabilitySet::of(&[markers::TASK_HANDLER])
    }
  }

  #[async_trait]
  impl TaskHandler for EchoHandler {
    fn identity(&self) -> &str {
      "echo"
    }

    fn input_type(&self) -> TargetType {
      TargetType::Json
    }

    async fn handle(&self, input: WorkValue) -> Result<WorkValue, HandlerError> {
      Ok(input)
    }
  }

  fn converter() -> Arc<dyn PayloadConverter> {
    Arc::new(
      CodecChain::with_codecs(vec![
        Arc::new(NilCodec),
        Arc::new(BinaryCodec),
        Arc::new(OpenRecordCodec::new()),
        Arc::new(JsonCodec),
      ])
      .unwrap(),
    )
  }

  async fn send_item(
    sender: &mpsc::Sender<WorkItem>,
    task: &str,
    payload: Payload,
  ) -> Result<Payload, DispatchError> {
    let (reply, response) = oneshot::channel();
    sender
      .send(WorkItem {
        task: task.to_string(),
        payload,
        reply,
      })
      .await
      .expect("worker channel closed");
    response.await.expect("worker dropped reply")
  }

  #[tokio::test]
  async fn test_dispatches_item_to_registered_handler() {
    let converter = converter();
    let mut worker =
      ChannelWorkerFactory::default().new_channel_worker("default", converter.clone());
    worker.register_task(Arc::new(EchoHandler));
    let sender = worker.sender();

    let cancel = CancellationToken::new();
    let join = tokio::spawn(Box::new(worker).run(cancel.clone()));

    let payload = converter.encode(&WorkValue::Json(json!({"n": 3}))).unwrap();
    let reply = send_item(&sender, "echo", payload).await.unwrap();
    let decoded = converter.decode(&reply, &TargetType::Json).unwrap();
    assert_eq!(decoded, WorkValue::Json(json!({"n": 3})));

    cancel.cancel();
    join.await.unwrap().unwrap();
  }

  #[tokio::test]
  async fn test_unknown_task_gets_typed_error_and_loop_survives() {
    let converter = converter();
    let mut worker =
      ChannelWorkerFactory::default().new_channel_worker("default", converter.clone());
    worker.register_task(Arc::new(EchoHandler));
    let sender = worker.sender();

    let cancel = CancellationToken::new();
    let join = tokio::spawn(Box::new(worker).run(cancel.clone()));

    let payload = converter.encode(&WorkValue::Json(json!(1))).unwrap();
    let result = send_item(&sender, "missing", payload).await;
    assert!(matches!(
      result,
      Err(DispatchError::UnknownTask { task }) if task == "missing"
    ));

    // The loop is still alive and dispatching after the failed item.
    let payload = converter.encode(&WorkValue::Json(json!(2))).unwrap();
    assert!(send_item(&sender, "echo", payload).await.is_ok());

    cancel.cancel();
    join.await.unwrap().unwrap();
  }

  #[tokio::test]
  async fn test_codec_failure_is_surfaced_per_item() {
    let converter = converter();
    let mut worker =
      ChannelWorkerFactory::default().new_channel_worker("default", converter.clone());
    worker.register_task(Arc::new(EchoHandler));
    let sender = worker.sender();

    let cancel = CancellationToken::new();
    let join = tokio::spawn(Box::new(worker).run(cancel.clone()));

    // A payload claiming a tag no codec in the chain owns.
    let result = send_item(&sender, "echo", Payload::new("json/protobuf", vec![])).await;
    assert!(matches!(result, Err(DispatchError::Codec(_))));

    cancel.cancel();
    join.await.unwrap().unwrap();
  }

  #[tokio::test]
  async fn test_cancellation_ends_loop_cleanly() {
    let worker = ChannelWorkerFactory::default().new_channel_worker("default", converter());
    let cancel = CancellationToken::new();
    cancel.cancel();

    Box::new(worker).run(cancel).await.unwrap();
  }
}
