use serde::{Deserialize, Serialize};

/// Encoded bytes plus the tag of the codec that produced them.
///
/// The tag is recorded at encode time so decode can dispatch to the owning
/// codec without guessing, regardless of chain order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
  /// Tag of the codec that produced this payload.
  pub encoding: String,
  /// The encoded bytes.
  pub data: Vec<u8>,
}

impl Payload {
  pub fn new(encoding: impl Into<String>, data: Vec<u8>) -> Self {
    Self {
      encoding: encoding.into(),
      data,
    }
  }
}
