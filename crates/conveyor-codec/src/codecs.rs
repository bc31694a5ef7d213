//! Builtin codecs.
//!
//! The default chain order is nil, binary, open-record, json: structureless
//! codecs first so the generic JSON catch-all never shadows them.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::codec::Codec;
use crate::error::CodecError;
use crate::payload::Payload;
use crate::serializer::{DefaultSerializerFactory, RecordSerializer, SerializerError, SerializerFactory};
use crate::value::{TargetType, WorkValue};

/// Tag for [`NilCodec`].
pub const NIL_ENCODING: &str = "binary/null";
/// Tag for [`BinaryCodec`].
pub const BINARY_ENCODING: &str = "binary/plain";
/// Tag for [`RecordCodec`].
pub const RECORD_ENCODING: &str = "json/record";
/// Tag for [`OpenRecordCodec`].
pub const OPEN_RECORD_ENCODING: &str = "json/open-record";
/// Tag for [`JsonCodec`].
pub const JSON_ENCODING: &str = "json/plain";

fn invalid_payload(tag: &str, err: SerializerError) -> CodecError {
  CodecError::InvalidPayload {
    tag: tag.to_string(),
    message: err.to_string(),
  }
}

fn incompatible(tag: &str, target: &TargetType) -> CodecError {
  CodecError::IncompatibleTargetType {
    tag: tag.to_string(),
    target: target.to_string(),
  }
}

/// Encodes the absent value. Always first in the default chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct NilCodec;

impl Codec for NilCodec {
  fn encoding(&self) -> &str {
    NIL_ENCODING
  }

  fn encode(&self, value: &WorkValue) -> Result<Option<Payload>, CodecError> {
    match value {
      WorkValue::Nil => Ok(Some(Payload::new(NIL_ENCODING, Vec::new()))),
      _ => Ok(None),
    }
  }

  fn decode(&self, _payload: &Payload, _target: &TargetType) -> Result<WorkValue, CodecError> {
    // An absent value has no structure to conflict with any target.
    Ok(WorkValue::Nil)
  }
}

/// Passes raw bytes through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
  fn encoding(&self) -> &str {
    BINARY_ENCODING
  }

  fn encode(&self, value: &WorkValue) -> Result<Option<Payload>, CodecError> {
    match value {
      WorkValue::Bytes(data) => Ok(Some(Payload::new(BINARY_ENCODING, data.clone()))),
      _ => Ok(None),
    }
  }

  fn decode(&self, payload: &Payload, target: &TargetType) -> Result<WorkValue, CodecError> {
    match target {
      TargetType::Bytes => Ok(WorkValue::Bytes(payload.data.clone())),
      other => Err(incompatible(BINARY_ENCODING, other)),
    }
  }
}

/// The structured-object codec: nominal records only.
///
/// Declines everything that is not a [`WorkValue::Record`], including
/// schema-less maps. Decode requires a record target and rebuilds the
/// instance from the serialized field map.
pub struct RecordCodec {
  factory: Arc<dyn SerializerFactory>,
  serializer: OnceLock<RecordSerializer>,
}

impl RecordCodec {
  pub fn new() -> Self {
    Self::with_factory(Arc::new(DefaultSerializerFactory))
  }

  pub fn with_factory(factory: Arc<dyn SerializerFactory>) -> Self {
    Self {
      factory,
      serializer: OnceLock::new(),
    }
  }

  fn serializer(&self) -> &RecordSerializer {
    self.serializer.get_or_init(|| self.factory.create())
  }
}

impl Default for RecordCodec {
  fn default() -> Self {
    Self::new()
  }
}

impl Codec for RecordCodec {
  fn encoding(&self) -> &str {
    RECORD_ENCODING
  }

  fn encode(&self, value: &WorkValue) -> Result<Option<Payload>, CodecError> {
    match value {
      WorkValue::Record { fields, .. } => {
        let data = self
          .serializer()
          .serialize_fields(fields)
          .map_err(|e| invalid_payload(RECORD_ENCODING, e))?;
        Ok(Some(Payload::new(RECORD_ENCODING, data)))
      }
      _ => Ok(None),
    }
  }

  fn decode(&self, payload: &Payload, target: &TargetType) -> Result<WorkValue, CodecError> {
    match target {
      TargetType::Record(type_name) => {
        let fields = self
          .serializer()
          .deserialize_fields(&payload.data)
          .map_err(|e| invalid_payload(RECORD_ENCODING, e))?;
        Ok(WorkValue::record(type_name.clone(), fields))
      }
      other => Err(incompatible(RECORD_ENCODING, other)),
    }
  }
}

/// The opaque-map variant of [`RecordCodec`].
///
/// Additionally accepts schema-less maps, serialized through a generic JSON
/// representation with no type identity. Decoding to a map target returns
/// the raw field map without rebuilding any nominal type.
pub struct OpenRecordCodec {
  factory: Arc<dyn SerializerFactory>,
  serializer: OnceLock<RecordSerializer>,
}

impl OpenRecordCodec {
  pub fn new() -> Self {
    Self::with_factory(Arc::new(DefaultSerializerFactory))
  }

  pub fn with_factory(factory: Arc<dyn SerializerFactory>) -> Self {
    Self {
      factory,
      serializer: OnceLock::new(),
    }
  }

  fn serializer(&self) -> &RecordSerializer {
    self.serializer.get_or_init(|| self.factory.create())
  }
}

impl Default for OpenRecordCodec {
  fn default() -> Self {
    Self::new()
  }
}

impl Codec for OpenRecordCodec {
  fn encoding(&self) -> &str {
    OPEN_RECORD_ENCODING
  }

  fn encode(&self, value: &WorkValue) -> Result<Option<Payload>, CodecError> {
    match value {
      WorkValue::Record { fields, .. } => {
        let data = self
          .serializer()
          .serialize_fields(fields)
          .map_err(|e| invalid_payload(OPEN_RECORD_ENCODING, e))?;
        Ok(Some(Payload::new(OPEN_RECORD_ENCODING, data)))
      }
      WorkValue::Map(map) => {
        // Schema-less maps go through plain JSON, not the record serializer.
        let data = serde_json::to_vec(map).map_err(|e| CodecError::InvalidPayload {
          tag: OPEN_RECORD_ENCODING.to_string(),
          message: e.to_string(),
        })?;
        Ok(Some(Payload::new(OPEN_RECORD_ENCODING, data)))
      }
      _ => Ok(None),
    }
  }

  fn decode(&self, payload: &Payload, target: &TargetType) -> Result<WorkValue, CodecError> {
    match target {
      TargetType::Record(type_name) => {
        let fields = self
          .serializer()
          .deserialize_fields(&payload.data)
          .map_err(|e| invalid_payload(OPEN_RECORD_ENCODING, e))?;
        Ok(WorkValue::record(type_name.clone(), fields))
      }
      TargetType::Map => {
        let value: Value =
          serde_json::from_slice(&payload.data).map_err(|e| CodecError::InvalidPayload {
            tag: OPEN_RECORD_ENCODING.to_string(),
            message: e.to_string(),
          })?;
        match value {
          Value::Object(map) => Ok(WorkValue::Map(map)),
          _ => Err(incompatible(OPEN_RECORD_ENCODING, target)),
        }
      }
      other => Err(incompatible(OPEN_RECORD_ENCODING, other)),
    }
  }
}

/// The generic JSON catch-all. Last in the default chain.
///
/// Accepts anything with a JSON representation; a record encoded here loses
/// its nominal identity and becomes a plain object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
  fn to_payload(value: &impl serde::Serialize) -> Result<Option<Payload>, CodecError> {
    let data = serde_json::to_vec(value).map_err(|e| CodecError::InvalidPayload {
      tag: JSON_ENCODING.to_string(),
      message: e.to_string(),
    })?;
    Ok(Some(Payload::new(JSON_ENCODING, data)))
  }
}

impl Codec for JsonCodec {
  fn encoding(&self) -> &str {
    JSON_ENCODING
  }

  fn encode(&self, value: &WorkValue) -> Result<Option<Payload>, CodecError> {
    match value {
      WorkValue::Json(v) => Self::to_payload(v),
      WorkValue::Map(map) => Self::to_payload(map),
      WorkValue::Record { fields, .. } => Self::to_payload(fields),
      WorkValue::Nil | WorkValue::Bytes(_) => Ok(None),
    }
  }

  fn decode(&self, payload: &Payload, target: &TargetType) -> Result<WorkValue, CodecError> {
    let value: Value =
      serde_json::from_slice(&payload.data).map_err(|e| CodecError::InvalidPayload {
        tag: JSON_ENCODING.to_string(),
        message: e.to_string(),
      })?;
    match target {
      TargetType::Json => Ok(WorkValue::Json(value)),
      TargetType::Map => match value {
        Value::Object(map) => Ok(WorkValue::Map(map)),
        _ => Err(incompatible(JSON_ENCODING, target)),
      },
      TargetType::Record(type_name) => match value {
        Value::Object(fields) => Ok(WorkValue::record(type_name.clone(), fields)),
        _ => Err(incompatible(JSON_ENCODING, target)),
      },
      other => Err(incompatible(JSON_ENCODING, other)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn record_fields() -> serde_json::Map<String, Value> {
    let mut fields = serde_json::Map::new();
    fields.insert("customer".to_string(), json!("acme"));
    fields.insert("total".to_string(), json!(250));
    fields
  }

  #[test]
  fn test_nil_codec_accepts_only_nil() {
    let codec = NilCodec;
    assert!(codec.encode(&WorkValue::Nil).unwrap().is_some());
    assert!(codec.encode(&WorkValue::Json(json!(1))).unwrap().is_none());
    assert!(codec.encode(&WorkValue::Bytes(vec![1])).unwrap().is_none());
  }

  #[test]
  fn test_binary_codec_round_trips_bytes() {
    let codec = BinaryCodec;
    let payload = codec.encode(&WorkValue::Bytes(vec![1, 2, 3])).unwrap().unwrap();
    assert_eq!(payload.encoding, BINARY_ENCODING);
    let decoded = codec.decode(&payload, &TargetType::Bytes).unwrap();
    assert_eq!(decoded, WorkValue::Bytes(vec![1, 2, 3]));
  }

  #[test]
  fn test_binary_codec_rejects_non_bytes_target() {
    let codec = BinaryCodec;
    let payload = codec.encode(&WorkValue::Bytes(vec![9])).unwrap().unwrap();
    let result = codec.decode(&payload, &TargetType::Json);
    assert!(matches!(result, Err(CodecError::IncompatibleTargetType { .. })));
  }

  #[test]
  fn test_record_codec_declines_maps() {
    let codec = RecordCodec::new();
    assert!(codec.encode(&WorkValue::Map(record_fields())).unwrap().is_none());
    assert!(codec.encode(&WorkValue::Json(json!({"a": 1}))).unwrap().is_none());
  }

  #[test]
  fn test_record_codec_round_trips_record() {
    let codec = RecordCodec::new();
    let value = WorkValue::record("order", record_fields());
    let payload = codec.encode(&value).unwrap().unwrap();
    assert_eq!(payload.encoding, RECORD_ENCODING);

    let decoded = codec
      .decode(&payload, &TargetType::Record("order".to_string()))
      .unwrap();
    assert_eq!(decoded, value);
  }

  #[test]
  fn test_record_codec_requires_record_target() {
    let codec = RecordCodec::new();
    let value = WorkValue::record("order", record_fields());
    let payload = codec.encode(&value).unwrap().unwrap();

    let result = codec.decode(&payload, &TargetType::Map);
    assert!(matches!(result, Err(CodecError::IncompatibleTargetType { .. })));
  }

  #[test]
  fn test_open_record_codec_accepts_maps() {
    let codec = OpenRecordCodec::new();
    let payload = codec.encode(&WorkValue::Map(record_fields())).unwrap().unwrap();
    assert_eq!(payload.encoding, OPEN_RECORD_ENCODING);

    let decoded = codec.decode(&payload, &TargetType::Map).unwrap();
    assert_eq!(decoded, WorkValue::Map(record_fields()));
  }

  #[test]
  fn test_open_record_codec_hydrates_record_target() {
    let codec = OpenRecordCodec::new();
    let payload = codec.encode(&WorkValue::Map(record_fields())).unwrap().unwrap();

    let decoded = codec
      .decode(&payload, &TargetType::Record("order".to_string()))
      .unwrap();
    assert_eq!(decoded, WorkValue::record("order", record_fields()));
  }

  #[test]
  fn test_json_codec_is_a_catch_all_for_structured_values() {
    let codec = JsonCodec;
    assert!(codec.encode(&WorkValue::Json(json!([1, 2]))).unwrap().is_some());
    assert!(codec.encode(&WorkValue::Map(record_fields())).unwrap().is_some());
    assert!(
      codec
        .encode(&WorkValue::record("order", record_fields()))
        .unwrap()
        .is_some()
    );
    assert!(codec.encode(&WorkValue::Nil).unwrap().is_none());
    assert!(codec.encode(&WorkValue::Bytes(vec![0])).unwrap().is_none());
  }

  #[test]
  fn test_json_codec_rejects_non_object_for_map_target() {
    let codec = JsonCodec;
    let payload = codec.encode(&WorkValue::Json(json!([1, 2]))).unwrap().unwrap();
    let result = codec.decode(&payload, &TargetType::Map);
    assert!(matches!(result, Err(CodecError::IncompatibleTargetType { .. })));
  }

  #[test]
  fn test_record_codec_builds_serializer_once() {
    struct CountingFactory {
      calls: AtomicUsize,
    }

    impl SerializerFactory for CountingFactory {
      fn create(&self) -> RecordSerializer {
        self.calls.fetch_add(1, Ordering::SeqCst);
        RecordSerializer::default()
      }
    }

    let factory = Arc::new(CountingFactory {
      calls: AtomicUsize::new(0),
    });
    let codec = RecordCodec::with_factory(factory.clone());
    let value = WorkValue::record("order", record_fields());

    let first = codec.encode(&value).unwrap().unwrap();
    codec
      .decode(&first, &TargetType::Record("order".to_string()))
      .unwrap();
    codec.encode(&value).unwrap().unwrap();

    assert_eq!(factory.calls.load(Ordering::SeqCst), 1);
  }
}
