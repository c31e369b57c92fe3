//! Test fixtures shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use schema_envelope::{
    load_schema_dir, register_entry, Fingerprinter, InMemorySchemaRegistry, SchemaEntry,
};

static NEXT_CLUSTER: AtomicUsize = AtomicUsize::new(0);

pub fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn schemas_path() -> PathBuf {
    fixtures_path().join("schemas")
}

pub fn fingerprinter() -> Fingerprinter {
    Fingerprinter::initialize().expect("md5 self-test")
}

/// Stand-in for the external schema registry cluster.
///
/// Mirrors the lifecycle of the real collaborator: nothing is reachable
/// until `startup`, and `shutdown` drops every registered schema.
pub struct EmbeddedRegistryCluster {
    id: usize,
    registry: Option<InMemorySchemaRegistry>,
}

impl EmbeddedRegistryCluster {
    pub fn new() -> Self {
        Self {
            id: NEXT_CLUSTER.fetch_add(1, Ordering::Relaxed),
            registry: None,
        }
    }

    pub fn startup(&mut self) {
        if self.registry.is_none() {
            self.registry = Some(InMemorySchemaRegistry::new());
        }
    }

    pub fn shutdown(&mut self) {
        self.registry = None;
    }

    pub fn is_started(&self) -> bool {
        self.registry.is_some()
    }

    pub fn connection_string(&self) -> String {
        format!("inproc://schema-registry-{}", self.id)
    }

    /// The running registry; panics if the cluster is not started.
    pub fn registry(&self) -> &InMemorySchemaRegistry {
        self.registry
            .as_ref()
            .unwrap_or_else(|| panic!("{} is not started", self.connection_string()))
    }

    /// Register every fixture schema and return the entries.
    pub fn register_fixtures(&self, fingerprinter: &Fingerprinter) -> Vec<SchemaEntry> {
        let entries = load_schema_dir(fingerprinter, schemas_path(), "avsc", true).unwrap();
        for entry in &entries {
            register_entry(self.registry(), entry).unwrap();
        }
        entries
    }
}

impl Drop for EmbeddedRegistryCluster {
    fn drop(&mut self) {
        self.shutdown();
    }
}
