//! Conveyor Registry
//!
//! Capability-checked component bookkeeping for the composition root.
//! Components declare the capability markers they satisfy as explicit
//! [`CapabilitySet`]s; registries validate set membership at admission time
//! instead of introspecting types at runtime. All registries here are plain
//! owned values threaded through composition, never ambient process state.

mod definition;
mod error;
mod marker;
mod registry;
mod service;

pub use definition::ComponentDefinition;
pub use error::{AdmissionError, RegistryError};
pub use marker::{CapabilitySet, Marker};
pub use registry::{ComponentRegistry, TypeSource};
pub use service::{Capable, ServiceRegistry};
