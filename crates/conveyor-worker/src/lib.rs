//! Conveyor Worker
//!
//! The composition root: resolves configuration-described components into
//! validated instances (codec chain, worker factory, client factory, task
//! handlers) and drives the dispatch loop. Composition is synchronous and
//! runs once at startup; the chain and registries become immutable snapshots
//! the moment the worker enters its run loop.

mod bootstrap;
mod catalog;
mod client;
mod error;
mod handler;
pub mod markers;
mod source;
mod worker;

pub use bootstrap::{Composition, WorkerBootstrap, WorkerState};
pub use catalog::{ComponentCatalog, ComponentInstance, ConstructorContext};
pub use client::{ClientConfig, ClientFactory, WorkflowClient, WorkflowClientFactory};
pub use error::{
  BootstrapError, CatalogError, DispatchError, HandlerError, WorkerError, WorkflowFileError,
};
pub use handler::TaskHandler;
pub use source::{WORKFLOWS_FILE, load_workflow_file};
pub use worker::{ChannelWorker, ChannelWorkerFactory, WorkItem, Worker, WorkerFactory};
