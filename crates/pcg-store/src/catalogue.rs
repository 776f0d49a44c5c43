use std::collections::BTreeMap;

use pcg_core::errors::{codes, PcgError};
use pcg_core::serde::from_yaml_slice;
use pcg_core::ParamPath;
use serde::{Deserialize, Serialize};

use crate::store::ParameterStore;

/// Human-readable description of one formula and the paths it touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaEntry {
    /// Catalogue-wide unique identifier.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Paths the formula consumes.
    #[serde(default)]
    pub inputs: Vec<ParamPath>,
    /// Paths the formula produces.
    #[serde(default)]
    pub outputs: Vec<ParamPath>,
}

/// A catalogue path that the store does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedRef {
    /// Formula that references the path.
    pub formula: String,
    /// Missing path.
    pub path: ParamPath,
}

/// Read-only catalogue of formula metadata keyed by formula id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaCatalogue {
    entries: BTreeMap<String, FormulaEntry>,
}

impl FormulaCatalogue {
    /// Builds a catalogue, rejecting duplicate ids.
    pub fn from_entries(entries: impl IntoIterator<Item = FormulaEntry>) -> Result<Self, PcgError> {
        let mut catalogue = BTreeMap::new();
        for entry in entries {
            if catalogue.contains_key(&entry.id) {
                return Err(PcgError::config(
                    codes::DUPLICATE_FORMULA,
                    format!("formula `{}` is catalogued twice", entry.id),
                )
                .with_context("formula", entry.id.clone()));
            }
            catalogue.insert(entry.id.clone(), entry);
        }
        Ok(Self { entries: catalogue })
    }

    /// Parses a YAML list of formula entries.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, PcgError> {
        let entries: Vec<FormulaEntry> = from_yaml_slice(data)?;
        Self::from_entries(entries)
    }

    /// Looks up a formula by id.
    pub fn get(&self, id: &str) -> Option<&FormulaEntry> {
        self.entries.get(id)
    }

    /// Formulas in id order.
    pub fn iter(&self) -> impl Iterator<Item = &FormulaEntry> {
        self.entries.values()
    }

    /// Number of catalogued formulas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Formulas that consume or produce `path`.
    pub fn referencing(&self, path: &str) -> Vec<&FormulaEntry> {
        self.iter()
            .filter(|entry| {
                entry
                    .inputs
                    .iter()
                    .chain(entry.outputs.iter())
                    .any(|candidate| candidate.as_str() == path)
            })
            .collect()
    }

    /// Every referenced path the store does not hold, in formula id order.
    ///
    /// Renderers use this to substitute placeholders for sessions run with only
    /// a subset of units registered.
    pub fn unresolved(&self, store: &ParameterStore) -> Vec<UnresolvedRef> {
        let mut missing = Vec::new();
        for entry in self.iter() {
            for path in entry.inputs.iter().chain(entry.outputs.iter()) {
                if !store.has(path.as_str()) {
                    missing.push(UnresolvedRef {
                        formula: entry.id.clone(),
                        path: path.clone(),
                    });
                }
            }
        }
        missing
    }
}
