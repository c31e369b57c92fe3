//! Schema fingerprints
//!
//! A fingerprint is the MD5 digest of a schema's Parsing Canonical Form. It
//! is what producers embed in every envelope and what the registry is keyed
//! by, so it has to be identical across processes and platforms.

use std::fmt;
use std::str::FromStr;

use apache_avro::Schema;
use md5::{Digest, Md5};

use crate::error::{CodecError, Result};
use crate::hexcodec::{self, FINGERPRINT_LEN};

/// Known-answer vector checked once at startup: MD5("abc")
const SELF_TEST_INPUT: &[u8] = b"abc";
const SELF_TEST_DIGEST: [u8; FINGERPRINT_LEN] = [
    0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f, 0x7d, 0x28, 0xe1, 0x7f,
    0x72,
];

/// 16-byte schema identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hex form, as stored by the registry.
    pub fn to_hex(&self) -> String {
        hexcodec::to_hex(&self.0)
    }

    /// Parse the 32-character hex form.
    pub fn from_hex(s: &str) -> Result<Self> {
        hexcodec::to_bytes(s).map(Self)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; FINGERPRINT_LEN]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }
}

/// Derives fingerprints from schemas.
///
/// Holds no state. Constructing one runs a known-answer test against the
/// digest so a broken digest is a startup failure, not a per-call error.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprinter {
    _verified: (),
}

impl Fingerprinter {
    /// Verify the digest and return a ready fingerprinter.
    pub fn initialize() -> Result<Self> {
        let actual: [u8; FINGERPRINT_LEN] = Md5::digest(SELF_TEST_INPUT).into();
        if actual != SELF_TEST_DIGEST {
            return Err(CodecError::DigestUnavailable {
                expected: hexcodec::to_hex(&SELF_TEST_DIGEST),
                actual: hexcodec::to_hex(&actual),
            });
        }
        tracing::debug!("md5 self-test passed");
        Ok(Self { _verified: () })
    }

    /// Schema id for `schema`: 32 lowercase hex characters.
    pub fn fingerprint(&self, schema: &Schema) -> String {
        self.fingerprint_schema(schema).to_hex()
    }

    /// Raw fingerprint of `schema`'s canonical form.
    pub fn fingerprint_schema(&self, schema: &Schema) -> Fingerprint {
        self.fingerprint_canonical(&schema.canonical_form())
    }

    /// Fingerprint of already-canonical schema text.
    pub fn fingerprint_canonical(&self, canonical_form: &str) -> Fingerprint {
        Fingerprint(Md5::digest(canonical_form.as_bytes()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprinter() -> Fingerprinter {
        Fingerprinter::initialize().unwrap()
    }

    #[test]
    fn test_string_schema_golden() {
        let schema = Schema::parse_str(r#"{"type":"string"}"#).unwrap();
        assert_eq!(schema.canonical_form(), r#""string""#);
        assert_eq!(
            fingerprinter().fingerprint(&schema),
            "095d71cf12556b9d5e330ad575b3df5d"
        );
    }

    #[test]
    fn test_canonical_text_golden() {
        let fp = fingerprinter().fingerprint_canonical(r#"{"type":"string"}"#);
        assert_eq!(fp.to_hex(), "2809284b6e54d0d34017715ffe5636bd");
    }

    #[test]
    fn test_fingerprint_ignores_formatting() {
        let compact = Schema::parse_str(
            r#"{"type":"record","name":"PageView","fields":[{"name":"page","type":"string"}]}"#,
        )
        .unwrap();
        let spaced = Schema::parse_str(
            r#"{
                "type": "record",
                "name": "PageView",
                "doc": "documentation is not part of the canonical form",
                "fields": [ { "name": "page", "type": "string" } ]
            }"#,
        )
        .unwrap();

        let f = fingerprinter();
        assert_eq!(f.fingerprint(&compact), f.fingerprint(&spaced));
    }

    #[test]
    fn test_different_schemas_differ() {
        let f = fingerprinter();
        let a = Schema::parse_str(r#""string""#).unwrap();
        let b = Schema::parse_str(r#""long""#).unwrap();
        assert_ne!(f.fingerprint(&a), f.fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_shape() {
        let schema = Schema::parse_str(r#""bytes""#).unwrap();
        let hex = fingerprinter().fingerprint(&schema);
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_fingerprint_parse_display() {
        let fp: Fingerprint = "095d71cf12556b9d5e330ad575b3df5d".parse().unwrap();
        assert_eq!(fp.to_string(), "095d71cf12556b9d5e330ad575b3df5d");
        assert_eq!(fp.as_bytes()[0], 0x09);
    }
}
