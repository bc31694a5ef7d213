//! Codec error types.

/// Errors raised by codecs and the codec chain.
///
/// These surface to the encode/decode caller and are never swallowed; an
/// encode that no codec accepts is a terminal condition, not a silent drop.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
  /// A codec with this tag is already registered in the chain.
  #[error("codec with tag '{tag}' is already registered in this chain")]
  DuplicateTag { tag: String },

  /// No codec in the chain owns the payload's recorded tag.
  #[error("no codec registered for payload tag '{tag}'")]
  UnknownTag { tag: String },

  /// Every codec in the chain declined the value.
  #[error("no registered codec can encode a {value_kind} value")]
  NoApplicableCodec { value_kind: &'static str },

  /// The requested target type is structurally incompatible with the payload.
  #[error("codec '{tag}' cannot decode into target {target}")]
  IncompatibleTargetType { tag: String, target: String },

  /// The payload bytes are malformed for the claimed tag.
  #[error("codec '{tag}' could not process payload data: {message}")]
  InvalidPayload { tag: String, message: String },
}
