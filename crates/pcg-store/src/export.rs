use std::fs;
use std::path::Path;

use pcg_core::errors::PcgError;
use pcg_core::serde::{from_json_slice, to_canonical_json_bytes};
use pcg_core::{stable_hash_string, ParamPath, SchemaVersion, Status, Value};
use serde::{Deserialize, Serialize};

use crate::parameter::{Metadata, Parameter, Reference};
use crate::store::ParameterStore;

/// Schema version written into every export.
pub const EXPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

fn io_error(code: &str, path: &Path, err: impl ToString) -> PcgError {
    PcgError::serde(code, err.to_string()).with_context("file", path.display().to_string())
}

/// One flattened store record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Dotted key.
    pub path: ParamPath,
    /// Stored payload.
    pub value: Value,
    /// Trust classification.
    pub status: Status,
    /// Producing unit or `external`.
    pub source: String,
    /// Optional reference value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// Uninterpreted qualifiers.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    /// Sequence number assigned at write time.
    pub insertion_order: u64,
    /// Same-source rewrite count.
    #[serde(default)]
    pub revision: u32,
}

impl From<&Parameter> for ExportEntry {
    fn from(parameter: &Parameter) -> Self {
        Self {
            path: parameter.path.clone(),
            value: parameter.value.clone(),
            status: parameter.status,
            source: parameter.source.clone(),
            reference: parameter.reference.clone(),
            metadata: parameter.metadata.clone(),
            insertion_order: parameter.insertion_order,
            revision: parameter.revision,
        }
    }
}

impl From<ExportEntry> for Parameter {
    fn from(entry: ExportEntry) -> Self {
        Self {
            path: entry.path,
            value: entry.value,
            status: entry.status,
            source: entry.source,
            reference: entry.reference,
            metadata: entry.metadata,
            insertion_order: entry.insertion_order,
            revision: entry.revision,
        }
    }
}

/// Flat, insertion-ordered snapshot of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreExport {
    /// Schema of this payload.
    pub schema: SchemaVersion,
    /// SHA-256 of the canonical JSON of `entries`.
    pub store_hash: String,
    /// Records in insertion order.
    pub entries: Vec<ExportEntry>,
}

impl StoreExport {
    /// Builds an export from entries, computing the content hash.
    pub fn new(entries: Vec<ExportEntry>) -> Result<Self, PcgError> {
        let store_hash = stable_hash_string(&entries)?;
        Ok(Self {
            schema: EXPORT_SCHEMA,
            store_hash,
            entries,
        })
    }

    /// Checks the schema and recomputes the content hash.
    pub fn verify(&self) -> Result<(), PcgError> {
        if !EXPORT_SCHEMA.is_compatible_with(&self.schema) {
            return Err(PcgError::serde(
                "export_schema",
                format!(
                    "export schema {}.{}.{} is not readable",
                    self.schema.major, self.schema.minor, self.schema.patch
                ),
            ));
        }
        let actual = stable_hash_string(&self.entries)?;
        if actual != self.store_hash {
            return Err(PcgError::serde("export_hash_mismatch", "export content hash mismatch")
                .with_context("expected", self.store_hash.clone())
                .with_context("actual", actual));
        }
        Ok(())
    }

    /// Canonical JSON bytes of the export.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PcgError> {
        to_canonical_json_bytes(self)
    }

    /// Parses and verifies an export from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PcgError> {
        let export: StoreExport = from_json_slice(bytes)?;
        export.verify()?;
        Ok(export)
    }
}

impl ParameterStore {
    /// Flattens the store into an insertion-ordered export.
    pub fn export(&self) -> Result<StoreExport, PcgError> {
        StoreExport::new(self.entries().into_iter().map(ExportEntry::from).collect())
    }

    /// SHA-256 over the store contents; equal stores hash equally.
    pub fn content_hash(&self) -> Result<String, PcgError> {
        Ok(self.export()?.store_hash)
    }

    /// Rebuilds a store from a verified export, preserving insertion orders.
    pub fn from_export(export: &StoreExport) -> Result<Self, PcgError> {
        export.verify()?;
        let parameters = export.entries.iter().cloned().map(Parameter::from).collect();
        ParameterStore::from_parameters(parameters)
    }
}

/// Writes an export as canonical JSON.
pub fn write_export(path: &Path, export: &StoreExport) -> Result<(), PcgError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| io_error("export_dir", parent, err))?;
        }
    }
    fs::write(path, export.to_bytes()?).map_err(|err| io_error("export_write", path, err))
}

/// Reads and verifies an export written by [`write_export`].
pub fn read_export(path: &Path) -> Result<StoreExport, PcgError> {
    let bytes = fs::read(path).map_err(|err| io_error("export_read", path, err))?;
    StoreExport::from_slice(&bytes)
}
