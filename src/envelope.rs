//! The schema-tagged envelope
//!
//! ```text
//! byte 0       : format marker (0x00)
//! bytes 1..16  : 16-byte schema fingerprint
//! bytes 17..N  : serialized payload
//! ```
//!
//! There is no payload length prefix; the transport's own framing bounds
//! the envelope.

use std::io::Cursor;

use apache_avro::types::Value;
use serde::de::DeserializeOwned;

use crate::error::{CodecError, Result};
use crate::fingerprint::Fingerprint;
use crate::hexcodec::{self, FINGERPRINT_LEN};
use crate::record::Record;
use crate::registry::SchemaRegistry;
use crate::serializer;

/// Format marker for the only envelope version defined so far
pub const MAGIC_BYTE: u8 = 0x00;

/// Marker plus fingerprint
pub const HEADER_LEN: usize = 1 + FINGERPRINT_LEN;

/// Wrap an already-serialized payload.
///
/// `payload` of `None` is rejected before anything is written.
pub fn encode(schema_id: &str, payload: Option<&[u8]>) -> Result<Vec<u8>> {
    let payload = payload.ok_or_else(|| {
        CodecError::Validation(format!(
            "cannot encode null byte array, schemaId: {}",
            schema_id
        ))
    })?;
    let fingerprint = hexcodec::to_bytes(schema_id)?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.push(MAGIC_BYTE);
    out.extend_from_slice(&fingerprint);
    out.extend_from_slice(payload);

    tracing::debug!(schema_id, payload_len = payload.len(), "encoded envelope");
    Ok(out)
}

/// Serialize a structured record and wrap it.
pub fn encode_record(schema_id: &str, record: Option<&Record<'_>>) -> Result<Vec<u8>> {
    let record = record.ok_or_else(|| {
        CodecError::Validation(format!("cannot encode null Record, schemaId: {}", schema_id))
    })?;
    let payload = serializer::serialize(record)?;
    encode(schema_id, Some(payload.as_slice()))
}

/// A parsed view over envelope bytes; the payload is borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeRef<'a> {
    pub marker: u8,
    pub fingerprint: Fingerprint,
    pub payload: &'a [u8],
}

impl EnvelopeRef<'_> {
    /// Fingerprint in the hex form used as schema id
    pub fn schema_id(&self) -> String {
        self.fingerprint.to_hex()
    }
}

/// Split envelope bytes into marker, fingerprint and payload.
pub fn decode(bytes: &[u8]) -> Result<EnvelopeRef<'_>> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::MalformedEnvelope(format!(
            "expected at least {} bytes, got {}",
            HEADER_LEN,
            bytes.len()
        )));
    }
    let marker = bytes[0];
    if marker != MAGIC_BYTE {
        return Err(CodecError::UnsupportedFormat(marker));
    }

    let mut fingerprint = [0u8; FINGERPRINT_LEN];
    fingerprint.copy_from_slice(&bytes[1..HEADER_LEN]);

    Ok(EnvelopeRef {
        marker,
        fingerprint: Fingerprint::from_bytes(fingerprint),
        payload: &bytes[HEADER_LEN..],
    })
}

/// A record read back out of an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub fingerprint: Fingerprint,
    pub value: Value,
}

impl DecodedRecord {
    /// Convert into a statically-bound type.
    pub fn into_specific<T: DeserializeOwned>(self) -> Result<T> {
        apache_avro::from_value(&self.value).map_err(CodecError::Decoding)
    }
}

/// Decode an envelope and read its payload with the schema the registry
/// holds for its fingerprint.
pub fn decode_record<R>(bytes: &[u8], registry: &R) -> Result<DecodedRecord>
where
    R: SchemaRegistry + ?Sized,
{
    let envelope = decode(bytes)?;
    let schema_id = envelope.schema_id();
    let schema = registry
        .lookup(&schema_id)?
        .ok_or_else(|| CodecError::SchemaNotFound(schema_id.clone()))?;

    let mut reader = Cursor::new(envelope.payload);
    let value =
        apache_avro::from_avro_datum(&schema, &mut reader, None).map_err(CodecError::Decoding)?;

    let consumed = reader.position() as usize;
    if consumed != envelope.payload.len() {
        return Err(CodecError::MalformedEnvelope(format!(
            "{} trailing bytes after record for schema {}",
            envelope.payload.len() - consumed,
            schema_id
        )));
    }

    Ok(DecodedRecord {
        fingerprint: envelope.fingerprint,
        value,
    })
}
