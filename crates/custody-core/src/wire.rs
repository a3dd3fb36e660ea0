//! Transport encoding for records exchanged with a ledger service.
//!
//! Records travel as CBOR maps keyed by field name, so the encoding is
//! compact and self-describing. Fixed-size digests, keys, and signatures
//! carry `#[serde(with = "serde_bytes")]`, so they are CBOR byte strings
//! rather than arrays of integers, and a wrong length fails to decode.
//!
//! The transport form is independent of [`crate::canonical`]: only the
//! canonical bytes are hashed or signed, so two peers may disagree on field
//! order here without affecting verification.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;

/// Encode any wire type to CBOR.
pub fn to_wire<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, CoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CoreError::EncodingError(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Decode a wire type from CBOR.
pub fn from_wire<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}
