use crate::error::CodecError;
use crate::payload::Payload;
use crate::value::{TargetType, WorkValue};

/// A single value-encoding strategy with a stable tag.
///
/// Codecs are constructed once at composition time and must be pure and
/// reentrant afterwards, so a chain can be shared across concurrent handler
/// invocations. Lazily-built internal state (see `RecordSerializer`) is
/// memoized with at-most-once initialization.
pub trait Codec: Send + Sync {
  /// The stable tag identifying this codec's format.
  fn encoding(&self) -> &str;

  /// Encode a value, or return `Ok(None)` when the value is outside this
  /// codec's domain so the chain falls through to the next codec.
  fn encode(&self, value: &WorkValue) -> Result<Option<Payload>, CodecError>;

  /// Decode a payload into the requested target shape.
  fn decode(&self, payload: &Payload, target: &TargetType) -> Result<WorkValue, CodecError>;
}

/// The chain facade: what the worker and client factories depend on.
///
/// [`CodecChain`](crate::CodecChain) is the builtin implementation; a
/// configuration-supplied facade type can replace it.
pub trait PayloadConverter: Send + Sync {
  /// Encode with the first codec that accepts the value.
  fn encode(&self, value: &WorkValue) -> Result<Payload, CodecError>;

  /// Decode by the payload's recorded tag.
  fn decode(&self, payload: &Payload, target: &TargetType) -> Result<WorkValue, CodecError>;
}
