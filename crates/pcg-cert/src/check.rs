use std::fmt::{self, Display};
use std::sync::Arc;

use pcg_core::errors::PcgError;
use pcg_core::{Status, Value};
use pcg_store::{Deviation, ParameterStore};
use serde::{Deserialize, Serialize};

/// Boolean condition evaluated over the final store.
pub type Condition = Arc<dyn Fn(&CheckContext<'_>) -> Result<bool, PcgError> + Send + Sync>;

/// Outcome of a single certificate or gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    /// Condition held.
    Pass,
    /// Condition did not hold, or could not be evaluated.
    Fail,
}

impl CheckStatus {
    /// Whether this is [`CheckStatus::Pass`].
    pub fn passed(self) -> bool {
        self == CheckStatus::Pass
    }
}

impl Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => f.write_str("PASS"),
            CheckStatus::Fail => f.write_str("FAIL"),
        }
    }
}

/// Read access handed to conditions.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    store: &'a ParameterStore,
    tolerance: f64,
}

impl<'a> CheckContext<'a> {
    /// Creates a context over `store` with the check's tolerance.
    pub fn new(store: &'a ParameterStore, tolerance: f64) -> Self {
        Self { store, tolerance }
    }

    /// The full store.
    pub fn store(&self) -> &'a ParameterStore {
        self.store
    }

    /// Tolerance declared by the check being evaluated.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Value stored at `path`.
    pub fn get(&self, path: &str) -> Result<&'a Value, PcgError> {
        self.store.get(path)
    }

    /// Numeric value stored at `path`.
    pub fn number(&self, path: &str) -> Result<f64, PcgError> {
        self.store.number(path)
    }

    /// Trust class of the value at `path`.
    pub fn status(&self, path: &str) -> Result<Status, PcgError> {
        Ok(self.store.parameter(path)?.status)
    }

    /// Deviation of the stored value at `path` from its reference.
    pub fn deviation(&self, path: &str) -> Result<Deviation, PcgError> {
        self.store.deviation_of(path)
    }

    /// Whether `actual` lies within the tolerance of `expected`.
    pub fn within(&self, actual: f64, expected: f64) -> bool {
        (actual - expected).abs() <= self.tolerance
    }
}

pub(crate) fn evaluate(
    condition: &Condition,
    store: &ParameterStore,
    tolerance: f64,
) -> (CheckStatus, Option<String>) {
    match condition(&CheckContext::new(store, tolerance)) {
        Ok(true) => (CheckStatus::Pass, None),
        Ok(false) => (CheckStatus::Fail, None),
        Err(err) => (CheckStatus::Fail, Some(err.to_string())),
    }
}
