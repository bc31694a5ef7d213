//! Conveyor Resolver
//!
//! Turns loosely-typed configuration values into classified component
//! bindings. A configured value may name an already-registered component, a
//! constructible type, or nothing recognizable; the resolver decides which,
//! checks the required capability, and fails loudly on anything ambiguous or
//! misconfigured so startup stops instead of degrading.

mod error;
mod resolver;

pub use error::ResolveError;
pub use resolver::{Binding, BindingResolver};
