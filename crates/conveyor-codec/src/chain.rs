use std::sync::Arc;

use crate::codec::{Codec, PayloadConverter};
use crate::error::CodecError;
use crate::payload::Payload;
use crate::value::{TargetType, WorkValue};

/// An ordered chain of codecs.
///
/// Registration order is significant: encode walks the chain and the first
/// codec that accepts the value wins, so more specific codecs must be
/// registered before generic catch-alls. Decode ignores order entirely and
/// dispatches on the payload's recorded tag. Tags must be unique within one
/// chain; independent chains may reuse them.
#[derive(Default)]
pub struct CodecChain {
  codecs: Vec<Arc<dyn Codec>>,
}

impl CodecChain {
  pub fn new() -> Self {
    Self { codecs: Vec::new() }
  }

  /// Build a chain from an ordered codec list, registering each in turn.
  pub fn with_codecs(codecs: Vec<Arc<dyn Codec>>) -> Result<Self, CodecError> {
    let mut chain = Self::new();
    for codec in codecs {
      chain.register(codec)?;
    }
    Ok(chain)
  }

  /// Append a codec to the chain.
  pub fn register(&mut self, codec: Arc<dyn Codec>) -> Result<(), CodecError> {
    if self.codecs.iter().any(|c| c.encoding() == codec.encoding()) {
      return Err(CodecError::DuplicateTag {
        tag: codec.encoding().to_string(),
      });
    }
    self.codecs.push(codec);
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.codecs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.codecs.is_empty()
  }

  fn by_tag(&self, tag: &str) -> Option<&Arc<dyn Codec>> {
    self.codecs.iter().find(|c| c.encoding() == tag)
  }
}

impl PayloadConverter for CodecChain {
  fn encode(&self, value: &WorkValue) -> Result<Payload, CodecError> {
    for codec in &self.codecs {
      if let Some(payload) = codec.encode(value)? {
        return Ok(payload);
      }
    }
    Err(CodecError::NoApplicableCodec {
      value_kind: value.kind(),
    })
  }

  fn decode(&self, payload: &Payload, target: &TargetType) -> Result<WorkValue, CodecError> {
    let codec = self
      .by_tag(&payload.encoding)
      .ok_or_else(|| CodecError::UnknownTag {
        tag: payload.encoding.clone(),
      })?;
    codec.decode(payload, target)
  }
}
