//! Well-known capability markers.

use conveyor_registry::Marker;

/// A single payload codec usable in a chain.
pub const PAYLOAD_CODEC: Marker = Marker::new("conveyor.payload-codec");

/// A codec chain facade.
pub const CODEC_CHAIN: Marker = Marker::new("conveyor.codec-chain");

/// A worker factory.
pub const WORKER_FACTORY: Marker = Marker::new("conveyor.worker-factory");

/// A workflow client factory.
pub const CLIENT_FACTORY: Marker = Marker::new("conveyor.client-factory");

/// A task handler admissible into the task registry.
pub const TASK_HANDLER: Marker = Marker::new("conveyor.task-handler");

/// A workflow definition registrable with the worker.
pub const WORKFLOW_DEFINITION: Marker = Marker::new("conveyor.workflow-definition");
