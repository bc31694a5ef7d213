//! Field-map serialization for record codecs.
//!
//! The serializer is deliberately behind a factory seam: codecs hold the
//! factory and build the serializer on first use, memoized with `OnceLock`
//! so concurrent first use constructs it at most once.

use serde_json::{Map, Value};

/// Errors from field-map serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
  #[error("payload is not a JSON object")]
  NotAnObject,

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

/// Options controlling the serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializerOptions {
  /// Pretty-print the JSON output. Useful when inspecting payloads by hand.
  pub pretty: bool,
}

/// Serializes a record's field map to canonical JSON and back.
#[derive(Debug, Clone)]
pub struct RecordSerializer {
  options: SerializerOptions,
}

impl RecordSerializer {
  pub fn new(options: SerializerOptions) -> Self {
    Self { options }
  }

  /// Serialize a field map to JSON bytes.
  pub fn serialize_fields(&self, fields: &Map<String, Value>) -> Result<Vec<u8>, SerializerError> {
    let bytes = if self.options.pretty {
      serde_json::to_vec_pretty(fields)?
    } else {
      serde_json::to_vec(fields)?
    };
    Ok(bytes)
  }

  /// Deserialize JSON bytes back into a field map.
  ///
  /// Fails with [`SerializerError::NotAnObject`] when the payload is valid
  /// JSON but not an object.
  pub fn deserialize_fields(&self, data: &[u8]) -> Result<Map<String, Value>, SerializerError> {
    let value: Value = serde_json::from_slice(data)?;
    match value {
      Value::Object(fields) => Ok(fields),
      _ => Err(SerializerError::NotAnObject),
    }
  }
}

impl Default for RecordSerializer {
  fn default() -> Self {
    Self::new(SerializerOptions::default())
  }
}

/// Builds the serializer a record codec uses.
///
/// Custom factories let an embedder swap in different serializer options
/// without replacing the codec itself.
pub trait SerializerFactory: Send + Sync {
  fn create(&self) -> RecordSerializer;
}

/// The default factory: compact JSON, no options.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSerializerFactory;

impl SerializerFactory for DefaultSerializerFactory {
  fn create(&self) -> RecordSerializer {
    RecordSerializer::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn fields() -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("name".to_string(), json!("order-7"));
    fields.insert("total".to_string(), json!(42));
    fields
  }

  #[test]
  fn test_round_trips_field_map() {
    let serializer = RecordSerializer::default();
    let bytes = serializer.serialize_fields(&fields()).unwrap();
    let decoded = serializer.deserialize_fields(&bytes).unwrap();
    assert_eq!(decoded, fields());
  }

  #[test]
  fn test_rejects_non_object_payload() {
    let serializer = RecordSerializer::default();
    let result = serializer.deserialize_fields(b"[1, 2, 3]");
    assert!(matches!(result, Err(SerializerError::NotAnObject)));
  }

  #[test]
  fn test_pretty_output_still_round_trips() {
    let serializer = RecordSerializer::new(SerializerOptions { pretty: true });
    let bytes = serializer.serialize_fields(&fields()).unwrap();
    assert!(bytes.contains(&b'\n'));
    assert_eq!(serializer.deserialize_fields(&bytes).unwrap(), fields());
  }
}
