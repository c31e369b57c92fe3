//! Schema Envelope
//!
//! Schema-tagged binary envelopes for Avro records. Every serialized record
//! carries the fingerprint of its writer schema, so a consumer that has never
//! seen the schema can resolve it from a registry later.
//!
//! ## Wire Format
//!
//! ```text
//! +--------+----------------------+-------------------+
//! | 0x00   | fingerprint (16 B)   | payload (N bytes) |
//! +--------+----------------------+-------------------+
//! ```
//!
//! The fingerprint is the MD5 digest of the schema's Parsing Canonical Form
//! and is exchanged with the registry as 32 lowercase hex characters.
//!
//! ## Example
//!
//! ```rust
//! use schema_envelope::{encode, encode_record, Fingerprinter, GenericRecord, Record};
//!
//! let fingerprinter = Fingerprinter::initialize()?;
//! let schema = schema_envelope::parse_schema(r#"{"type":"string"}"#)?;
//! let schema_id = fingerprinter.fingerprint(&schema);
//!
//! let raw = encode(&schema_id, Some(b"\x06abc".as_slice()))?;
//!
//! let record = GenericRecord::from_json(schema, serde_json::json!("abc"))?;
//! let structured = encode_record(&schema_id, Some(&Record::generic(&record)))?;
//! assert_eq!(raw, structured);
//! # Ok::<(), schema_envelope::CodecError>(())
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod fingerprint;
pub mod hexcodec;
pub mod record;
pub mod registry;
pub mod schema;
pub mod serializer;

pub use config::{EnvelopeConfig, OutputFormat};
pub use envelope::{decode, decode_record, encode, encode_record, DecodedRecord, EnvelopeRef, HEADER_LEN, MAGIC_BYTE};
pub use error::{CodecError, EncodingError, Result};
pub use fingerprint::{Fingerprint, Fingerprinter};
pub use record::{AvroRecord, GenericRecord, Record};
pub use registry::{load_schema_dir, register_entry, register_schema, InMemorySchemaRegistry, SchemaRegistry};
pub use schema::{parse_schema, SchemaEntry};
pub use serializer::serialize;
