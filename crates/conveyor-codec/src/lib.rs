//! Conveyor Codec
//!
//! Payload encoding for Conveyor workers. A [`Codec`] is a single encoding
//! strategy identified by a stable tag; a [`CodecChain`] is an ordered set of
//! codecs where the first codec that accepts a value wins on encode, and
//! decode is dispatched by the tag recorded on the payload. Chain order is a
//! specificity ordering: structureless codecs first, generic catch-alls last.

mod chain;
mod codec;
mod codecs;
mod error;
mod payload;
mod serializer;
mod value;

pub use chain::CodecChain;
pub use codec::{Codec, PayloadConverter};
pub use codecs::{
  BINARY_ENCODING, BinaryCodec, JSON_ENCODING, JsonCodec, NIL_ENCODING, NilCodec,
  OPEN_RECORD_ENCODING, OpenRecordCodec, RECORD_ENCODING, RecordCodec,
};
pub use error::CodecError;
pub use payload::Payload;
pub use serializer::{DefaultSerializerFactory, RecordSerializer, SerializerError, SerializerFactory, SerializerOptions};
pub use value::{TargetType, WorkValue};
