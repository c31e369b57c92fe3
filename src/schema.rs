//! Schema types and structures

use std::path::PathBuf;

use apache_avro::Schema;

use crate::error::{CodecError, Result};
use crate::fingerprint::{Fingerprint, Fingerprinter};

/// Parse Avro schema JSON.
pub fn parse_schema(text: &str) -> Result<Schema> {
    Schema::parse_str(text).map_err(CodecError::InvalidSchema)
}

/// Best-effort display name for a schema: the full name for named types,
/// the canonical form for everything else.
pub fn schema_name(schema: &Schema) -> String {
    match schema {
        Schema::Record(record) => record.name.fullname(None),
        Schema::Enum(e) => e.name.fullname(None),
        Schema::Fixed(fixed) => fixed.name.fullname(None),
        other => other.canonical_form(),
    }
}

/// A schema as it exists after registration.
///
/// The canonical form and fingerprint are computed once here and referenced
/// for the rest of the process; nothing downstream recomputes them.
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    /// Display name (e.g., "com.example.PageView")
    pub name: String,
    /// The parsed schema
    pub schema: Schema,
    /// Parsing Canonical Form used as fingerprint input
    pub canonical_form: String,
    /// MD5 of the canonical form
    pub fingerprint: Fingerprint,
    /// Source file the schema was loaded from (if applicable)
    pub source_path: Option<PathBuf>,
}

impl SchemaEntry {
    /// Create a new schema entry
    pub fn new(fingerprinter: &Fingerprinter, schema: Schema) -> Self {
        let canonical_form = schema.canonical_form();
        let fingerprint = fingerprinter.fingerprint_canonical(&canonical_form);
        Self {
            name: schema_name(&schema),
            schema,
            canonical_form,
            fingerprint,
            source_path: None,
        }
    }

    /// Parse schema text and create an entry for it
    pub fn parse(fingerprinter: &Fingerprinter, text: &str) -> Result<Self> {
        Ok(Self::new(fingerprinter, parse_schema(text)?))
    }

    /// Record where this schema was loaded from
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Schema id in its hex form
    pub fn schema_id(&self) -> String {
        self.fingerprint.to_hex()
    }
}
