//! Conveyor Config
//!
//! Serializable configuration for a Conveyor worker process: backend
//! address, queue, payload converter chain, loading mode, and client
//! options. Values referencing components (`worker.factory`,
//! `worker.data_converter.*`, `workflow.client.factory`) are type-or-id
//! strings classified later by the binding resolver; this crate only carries
//! them and their defaults.

mod client;
mod config;
mod enums;
mod error;

pub use client::{ClientOptionsConfig, ClientSection, QueryRejectCondition};
pub use config::{
  DEFAULT_CLIENT_FACTORY, DEFAULT_CODEC_CHAIN, DEFAULT_WORKER_FACTORY, DataConverterSection,
  WorkerConfig, WorkerSection, WorkflowSection, default_converters,
};
pub use enums::LoadingMode;
pub use error::ConfigError;
