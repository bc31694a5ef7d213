//! Worker bootstrap.
//!
//! Composes the worker out of configuration: codec chain first (both
//! factories depend on it), then the worker and client factory bindings,
//! then workflow identities and the capability-validated task registry.
//! Composition is fail-fast: any resolution or admission error aborts before
//! a worker is ever started.

use std::path::PathBuf;
use std::sync::Arc;

use conveyor_codec::{Codec, CodecError, PayloadConverter};
use conveyor_config::{
  DEFAULT_CLIENT_FACTORY, DEFAULT_CODEC_CHAIN, DEFAULT_WORKER_FACTORY, LoadingMode, WorkerConfig,
};
use conveyor_registry::{ComponentRegistry, ServiceRegistry};
use conveyor_resolver::{Binding, BindingResolver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::catalog::{ComponentCatalog, ConstructorContext};
use crate::client::{ClientConfig, WorkflowClient};
use crate::error::BootstrapError;
use crate::handler::TaskHandler;
use crate::markers;
use crate::source::load_workflow_file;
use crate::worker::WorkerFactory;

/// Bootstrap lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
  Idle,
  Composing,
  Running,
  Stopped,
}

/// Everything composition produces.
pub struct Composition {
  pub converter: Arc<dyn PayloadConverter>,
  pub worker_factory: Arc<dyn WorkerFactory>,
  pub client: WorkflowClient,
  pub workflows: Vec<String>,
  pub tasks: ServiceRegistry<Arc<dyn TaskHandler>>,
}

impl std::fmt::Debug for Composition {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Composition")
      .field("workflows", &self.workflows)
      .finish_non_exhaustive()
  }
}

/// Owns composition and the worker lifecycle for one process.
pub struct WorkerBootstrap {
  config: WorkerConfig,
  catalog: ComponentCatalog,
  registry: ComponentRegistry,
  config_dir: PathBuf,
  state: WorkerState,
}

impl WorkerBootstrap {
  pub fn new(
    config: WorkerConfig,
    catalog: ComponentCatalog,
    registry: ComponentRegistry,
    config_dir: impl Into<PathBuf>,
  ) -> Self {
    Self {
      config,
      catalog,
      registry,
      config_dir: config_dir.into(),
      state: WorkerState::Idle,
    }
  }

  pub fn state(&self) -> WorkerState {
    self.state
  }

  /// Run the worker to completion.
  ///
  /// Returns the process exit code on orderly outcomes: 0 after the dispatch
  /// loop ends cleanly, 1 for an empty queue name (rejected before any
  /// composition work). Composition failures are returned as errors.
  pub async fn run(&mut self, cancel: CancellationToken) -> Result<i32, BootstrapError> {
    let queue = self.config.worker.queue.clone();
    if queue.is_empty() {
      error!("worker queue name is empty");
      self.state = WorkerState::Stopped;
      return Ok(1);
    }

    let composition = match self.compose() {
      Ok(composition) => composition,
      Err(e) => {
        self.state = WorkerState::Stopped;
        return Err(e);
      }
    };

    let mut worker = composition
      .worker_factory
      .new_worker(&queue, composition.converter.clone());
    for identity in &composition.workflows {
      worker.register_workflow(identity);
    }
    for handler in composition.tasks.iter() {
      worker.register_task(handler.clone());
    }

    info!(
      queue = %queue,
      address = %self.config.address,
      namespace = %composition.client.namespace,
      workflows = composition.workflows.len(),
      tasks = composition.tasks.len(),
      "worker starting"
    );

    self.state = WorkerState::Running;
    let result = worker.run(cancel).await;
    self.state = WorkerState::Stopped;
    result?;

    info!(queue = %queue, "worker stopped");
    Ok(0)
  }

  /// Resolve and construct every component the worker depends on.
  pub fn compose(&mut self) -> Result<Composition, BootstrapError> {
    self.state = WorkerState::Composing;
    self.config.validate()?;

    let converter_ids = self.config.worker.data_converter.converters.clone();
    let chain_class = self.config.worker.data_converter.class.clone();
    let worker_factory_value = self.config.worker.factory.clone();
    let client_section = self.config.effective_client();
    let loading_mode = self.config.workflow.loading_mode;

    // The chain comes first; both factories depend on it.
    let mut codec_bindings = Vec::with_capacity(converter_ids.len());
    let chain_binding;
    {
      let mut resolver = BindingResolver::new(&self.catalog, &mut self.registry);
      for value in &converter_ids {
        codec_bindings.push(resolver.resolve(
          Some(value.as_str()),
          markers::PAYLOAD_CODEC,
          value,
          false,
        )?);
      }
      chain_binding = resolver.resolve(
        chain_class.as_deref(),
        markers::CODEC_CHAIN,
        DEFAULT_CODEC_CHAIN,
        true,
      )?;
    }

    let ctx = ConstructorContext::new();
    let mut codecs: Vec<Arc<dyn Codec>> = Vec::with_capacity(codec_bindings.len());
    for binding in &codec_bindings {
      let codec = self
        .catalog
        .construct(binding.type_name(), &ctx)?
        .into_codec(binding.type_name())?;
      if codecs.iter().any(|c| c.encoding() == codec.encoding()) {
        return Err(
          CodecError::DuplicateTag {
            tag: codec.encoding().to_string(),
          }
          .into(),
        );
      }
      debug!(codec = binding.type_name(), tag = codec.encoding(), "codec constructed");
      codecs.push(codec);
    }

    let chain_ctx = ConstructorContext::new().with_codecs(codecs);
    let converter = self
      .catalog
      .construct(chain_binding.type_name(), &chain_ctx)?
      .into_converter(chain_binding.type_name())?;

    let worker_factory_binding;
    let client_factory_binding;
    {
      let mut resolver = BindingResolver::new(&self.catalog, &mut self.registry);
      worker_factory_binding = resolver.resolve(
        worker_factory_value.as_deref(),
        markers::WORKER_FACTORY,
        DEFAULT_WORKER_FACTORY,
        false,
      )?;
      client_factory_binding = resolver.resolve(
        client_section.factory.as_deref(),
        markers::CLIENT_FACTORY,
        DEFAULT_CLIENT_FACTORY,
        false,
      )?;
    }

    let worker_factory = self
      .catalog
      .construct(worker_factory_binding.type_name(), &ctx)?
      .into_worker_factory(worker_factory_binding.type_name())?;
    let client_factory = self
      .catalog
      .construct(client_factory_binding.type_name(), &ctx)?
      .into_client_factory(client_factory_binding.type_name())?;

    let client = client_factory.create(&ClientConfig {
      address: self.config.address.clone(),
      options: client_section.options.clone(),
      converter: converter.clone(),
    });

    let workflows = self.workflow_identities(loading_mode)?;

    // Task handlers are container-backed: every definition carrying the
    // handler marker is constructed and re-validated at admission.
    let handler_definitions: Vec<(String, String)> = self
      .registry
      .definitions()
      .filter(|d| d.capabilities.contains(&markers::TASK_HANDLER))
      .map(|d| (d.id.clone(), d.type_name.clone()))
      .collect();

    let mut tasks: ServiceRegistry<Arc<dyn TaskHandler>> =
      ServiceRegistry::new(markers::TASK_HANDLER);
    for (id, type_name) in &handler_definitions {
      let handler = self
        .catalog
        .construct(type_name, &ctx)?
        .into_handler(type_name)?;
      debug!(id = %id, task = handler.identity(), "task handler admitted");
      tasks.admit(handler)?;
    }

    info!(
      codecs = codec_bindings.len(),
      workflows = workflows.len(),
      tasks = tasks.len(),
      "composition complete"
    );

    Ok(Composition {
      converter,
      worker_factory,
      client,
      workflows,
      tasks,
    })
  }

  fn workflow_identities(&mut self, mode: LoadingMode) -> Result<Vec<String>, BootstrapError> {
    match mode {
      LoadingMode::File => {
        let identities = load_workflow_file(&self.config_dir)?;
        let mut resolver = BindingResolver::new(&self.catalog, &mut self.registry);
        for identity in &identities {
          // Validate each identity resolves with the workflow marker before
          // the worker ever sees it.
          let binding = resolver.resolve(
            Some(identity.as_str()),
            markers::WORKFLOW_DEFINITION,
            identity,
            false,
          )?;
          if let Binding::Literal { .. } = binding {
            debug!(workflow = %identity, "workflow defined from file");
          }
        }
        Ok(identities)
      }
      LoadingMode::Container => Ok(
        self
          .registry
          .definitions()
          .filter(|d| d.capabilities.contains(&markers::WORKFLOW_DEFINITION))
          .map(|d| d.id.clone())
          .collect(),
      ),
    }
  }
}
