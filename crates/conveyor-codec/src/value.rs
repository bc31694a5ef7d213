use std::fmt;

use serde_json::{Map, Value};

/// A runtime value flowing through the worker.
///
/// Rust has no runtime reflection, so the value model is explicit: a
/// [`WorkValue::Record`] carries its nominal type identity alongside a field
/// map, which is what codecs use in place of structural introspection.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkValue {
  /// The absent value.
  Nil,
  /// Raw bytes, passed through untouched.
  Bytes(Vec<u8>),
  /// An arbitrary JSON value.
  Json(Value),
  /// A schema-less key/value map with no declared type.
  Map(Map<String, Value>),
  /// A nominal structured instance: type identity plus field map.
  Record {
    type_name: String,
    fields: Map<String, Value>,
  },
}

impl WorkValue {
  /// Short name of the value's kind, for error messages.
  pub fn kind(&self) -> &'static str {
    match self {
      WorkValue::Nil => "nil",
      WorkValue::Bytes(_) => "bytes",
      WorkValue::Json(_) => "json",
      WorkValue::Map(_) => "map",
      WorkValue::Record { .. } => "record",
    }
  }

  /// Convenience constructor for a record value.
  pub fn record(type_name: impl Into<String>, fields: Map<String, Value>) -> Self {
    WorkValue::Record {
      type_name: type_name.into(),
      fields,
    }
  }
}

/// The shape a decode caller wants back.
///
/// Decode never guesses: a codec checks the target against the payload it
/// produced and fails with a typed error on structural mismatch.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetType {
  Nil,
  Bytes,
  Json,
  Map,
  /// A nominal structured type, identified by name.
  Record(String),
}

impl fmt::Display for TargetType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetType::Nil => write!(f, "nil"),
      TargetType::Bytes => write!(f, "bytes"),
      TargetType::Json => write!(f, "json"),
      TargetType::Map => write!(f, "map"),
      TargetType::Record(name) => write!(f, "record '{}'", name),
    }
  }
}
