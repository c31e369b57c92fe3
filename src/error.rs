//! Error types for the envelope codec

use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Envelope codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid fingerprint format {input:?}: {reason}")]
    InvalidFingerprintFormat { input: String, reason: String },

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Decoding error: {0}")]
    Decoding(#[source] apache_avro::Error),

    #[error("Digest self-test failed: expected {expected}, got {actual}")]
    DigestUnavailable { expected: String, actual: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(#[source] apache_avro::Error),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Unsupported envelope format marker: {0:#04x}")]
    UnsupportedFormat(u8),

    #[error("Schema not found for fingerprint {0}")]
    SchemaNotFound(String),

    #[error("Fingerprint collision: {fingerprint} is already registered with different canonical text")]
    FingerprintCollision { fingerprint: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures raised while serializing a structured record.
///
/// Kept separate from [`CodecError`] so the serializer's contract stays
/// narrow; it converts into `CodecError::Encoding` with the cause intact.
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Avro error: {0}")]
    Avro(#[from] apache_avro::Error),
}
