//! Schema Registry
//!
//! The codec never talks to a registry itself; producers register schemas
//! here at startup and consumers resolve envelope fingerprints back to
//! schemas through the [`SchemaRegistry`] trait.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use apache_avro::Schema;
use walkdir::WalkDir;

use crate::error::{CodecError, Result};
use crate::fingerprint::{Fingerprint, Fingerprinter};
use crate::schema::{parse_schema, SchemaEntry};

/// Registry contract: store canonical text under a schema id, resolve ids
/// back to full schemas.
pub trait SchemaRegistry {
    /// Register `canonical_form` under `schema_id`.
    fn register(&self, canonical_form: &str, schema_id: &str) -> Result<()>;

    /// Resolve a schema id; `Ok(None)` when nothing is registered under it.
    fn lookup(&self, schema_id: &str) -> Result<Option<Schema>>;
}

/// Process-local registry
#[derive(Debug, Default)]
pub struct InMemorySchemaRegistry {
    /// Canonical text and parsed schema per fingerprint
    entries: RwLock<HashMap<Fingerprint, (String, Schema)>>,
}

impl InMemorySchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All registered schema ids, sorted
    pub fn schema_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.read().keys().map(Fingerprint::to_hex).collect();
        ids.sort();
        ids
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Fingerprint, (String, Schema)>> {
        // a poisoned lock still holds a consistent map: inserts are single calls
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn register(&self, canonical_form: &str, schema_id: &str) -> Result<()> {
        let fingerprint = Fingerprint::from_hex(schema_id)?;
        let schema = parse_schema(canonical_form)?;

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some((existing, _)) = entries.get(&fingerprint) {
            if existing == canonical_form {
                tracing::trace!(schema_id, "schema already registered");
                return Ok(());
            }
            tracing::warn!(schema_id, "rejecting schema with colliding fingerprint");
            return Err(CodecError::FingerprintCollision {
                fingerprint: schema_id.to_string(),
            });
        }

        entries.insert(fingerprint, (canonical_form.to_string(), schema));
        tracing::debug!(schema_id, "registered schema");
        Ok(())
    }

    fn lookup(&self, schema_id: &str) -> Result<Option<Schema>> {
        let fingerprint = Fingerprint::from_hex(schema_id)?;
        Ok(self.read().get(&fingerprint).map(|(_, schema)| schema.clone()))
    }
}

/// Fingerprint `schema`, register it, and return its schema id.
pub fn register_schema<R>(registry: &R, fingerprinter: &Fingerprinter, schema: &Schema) -> Result<String>
where
    R: SchemaRegistry + ?Sized,
{
    let entry = SchemaEntry::new(fingerprinter, schema.clone());
    register_entry(registry, &entry)?;
    Ok(entry.schema_id())
}

/// Register an already-fingerprinted entry.
pub fn register_entry<R>(registry: &R, entry: &SchemaEntry) -> Result<()>
where
    R: SchemaRegistry + ?Sized,
{
    registry.register(&entry.canonical_form, &entry.schema_id())
}

/// Load every schema file with `extension` under `dir`, sorted by path.
pub fn load_schema_dir(
    fingerprinter: &Fingerprinter,
    dir: impl AsRef<Path>,
    extension: &str,
    recursive: bool,
) -> Result<Vec<SchemaEntry>> {
    let dir = dir.as_ref();
    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut entries = Vec::new();
    for entry in walker.sort_by_file_name() {
        let entry = entry.map_err(|e| {
            CodecError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "directory walk loop detected")
            }))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(extension)
        {
            continue;
        }

        let text = std::fs::read_to_string(path)?;
        let schema = SchemaEntry::parse(fingerprinter, &text)?.with_source_path(path);
        tracing::debug!(path = %path.display(), schema_id = %schema.fingerprint, "loaded schema");
        entries.push(schema);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PAGE_VIEW: &str = r#"{"type":"record","name":"PageView","fields":[{"name":"page","type":"string"}]}"#;

    #[test]
    fn test_create_registry() {
        let registry = InMemorySchemaRegistry::new();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_and_lookup() {
        let f = Fingerprinter::initialize().unwrap();
        let registry = InMemorySchemaRegistry::new();
        let schema = parse_schema(PAGE_VIEW).unwrap();

        let id = register_schema(&registry, &f, &schema).unwrap();
        assert_eq!(id, f.fingerprint(&schema));
        assert_eq!(registry.lookup(&id).unwrap(), Some(schema));
        assert_eq!(registry.schema_ids(), vec![id]);
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = InMemorySchemaRegistry::new();
        assert!(registry
            .lookup("00000000000000000000000000000000")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_register_idempotent() {
        let f = Fingerprinter::initialize().unwrap();
        let registry = InMemorySchemaRegistry::new();
        let schema = parse_schema(PAGE_VIEW).unwrap();

        register_schema(&registry, &f, &schema).unwrap();
        register_schema(&registry, &f, &schema).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_collision_rejected() {
        let registry = InMemorySchemaRegistry::new();
        let id = "0123456789abcdef0123456789abcdef";

        registry.register(r#""string""#, id).unwrap();
        let result = registry.register(r#""long""#, id);
        assert!(matches!(result, Err(CodecError::FingerprintCollision { .. })));
    }

    #[test]
    fn test_malformed_id_rejected() {
        let registry = InMemorySchemaRegistry::new();
        assert!(matches!(
            registry.lookup("not-hex"),
            Err(CodecError::InvalidFingerprintFormat { .. })
        ));
    }

    #[test]
    fn test_load_schema_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.avsc"), PAGE_VIEW).unwrap();
        std::fs::write(dir.path().join("a.avsc"), r#"{"type":"string"}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.avsc"), r#""long""#).unwrap();

        let f = Fingerprinter::initialize().unwrap();

        let flat = load_schema_dir(&f, dir.path(), "avsc", false).unwrap();
        let names: Vec<_> = flat.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![r#""string""#, "PageView"]);

        let all = load_schema_dir(&f, dir.path(), "avsc", true).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|e| e.source_path.is_some()));
    }
}
