use std::collections::BTreeMap;

use pcg_core::{ParamPath, Status, Value};
use serde::{Deserialize, Serialize};

/// Free-form qualifiers the store carries but never interprets.
pub type Metadata = BTreeMap<String, Value>;

/// External comparison value used only for deviation scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Reference central value.
    pub expected_value: f64,
    /// One standard deviation of the reference value.
    pub uncertainty: f64,
    /// Where the reference value comes from.
    pub reference_source: String,
}

impl Reference {
    /// Creates a new reference value.
    pub fn new(expected_value: f64, uncertainty: f64, reference_source: impl Into<String>) -> Self {
        Self {
            expected_value,
            uncertainty,
            reference_source: reference_source.into(),
        }
    }
}

/// A single stored value together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Dotted key of the parameter.
    pub path: ParamPath,
    /// Stored payload.
    pub value: Value,
    /// Trust classification.
    pub status: Status,
    /// Unit id that produced the value, or `external` for seeds.
    pub source: String,
    /// Optional reference used for deviation scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// Uninterpreted side-channel qualifiers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Sequence number assigned by the store at write time.
    pub insertion_order: u64,
    /// Number of times the same source rewrote this path.
    #[serde(default)]
    pub revision: u32,
}
