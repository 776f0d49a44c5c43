use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pcg_core::errors::PcgError;
use pcg_core::serde::to_canonical_json_bytes;
use pcg_core::Value;
use serde::{Deserialize, Serialize};

use crate::check::{CheckContext, CheckStatus, Condition};
use crate::report::ValidationReport;

/// Source of timestamps stamped onto gate results.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant, for reproducible gate logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Audit gate: evaluated and logged, never affects overall success.
#[derive(Clone)]
pub struct Gate {
    /// Stable identifier.
    pub id: String,
    /// What the gate audits.
    pub description: String,
    /// Tolerance made available to the condition.
    pub tolerance: f64,
    /// Free-form details copied onto the result.
    pub details: BTreeMap<String, Value>,
    pub(crate) condition: Condition,
}

impl Gate {
    /// Declares a gate with zero tolerance and no details.
    pub fn new<F>(id: impl Into<String>, description: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&CheckContext<'_>) -> Result<bool, PcgError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            description: description.into(),
            tolerance: 0.0,
            details: BTreeMap::new(),
            condition: Arc::new(condition),
        }
    }

    /// Sets the tolerance passed to the condition.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Attaches a detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("tolerance", &self.tolerance)
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}

/// Evaluated gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    /// Gate identifier.
    pub id: String,
    /// What was audited.
    pub description: String,
    /// Outcome.
    pub status: CheckStatus,
    /// Details declared on the gate.
    pub details: BTreeMap<String, Value>,
    /// Evaluation instant.
    pub timestamp: DateTime<Utc>,
    /// Evaluation error, if the condition could not be computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Append-only record of gate results across validation runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateLog {
    entries: Vec<GateResult>,
}

impl GateLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every gate result of `report`, keeping gate declaration order.
    pub fn append(&mut self, report: &ValidationReport) {
        self.entries.extend(report.gates.iter().cloned());
    }

    /// Appends a single result.
    pub fn push(&mut self, result: GateResult) {
        self.entries.push(result);
    }

    /// Logged results, oldest first.
    pub fn entries(&self) -> &[GateResult] {
        &self.entries
    }

    /// Number of logged results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Results logged for gate `id`, oldest first.
    pub fn history(&self, id: &str) -> impl Iterator<Item = &GateResult> + '_ {
        let id = id.to_string();
        self.entries.iter().filter(move |result| result.id == id)
    }

    /// Canonical JSON form of the log.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PcgError> {
        to_canonical_json_bytes(self)
    }
}
