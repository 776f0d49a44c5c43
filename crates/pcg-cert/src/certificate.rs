use std::fmt;
use std::sync::Arc;

use pcg_core::errors::PcgError;
use serde::{Deserialize, Serialize};

use crate::check::{CheckContext, CheckStatus, Condition};

/// Boolean invariant over the final store that decides overall success.
#[derive(Clone)]
pub struct Certificate {
    /// Stable identifier.
    pub id: String,
    /// Human-readable statement of what is asserted.
    pub assertion: String,
    /// Tolerance made available to the condition.
    pub tolerance: f64,
    pub(crate) condition: Condition,
}

impl Certificate {
    /// Declares a certificate with zero tolerance.
    pub fn new<F>(id: impl Into<String>, assertion: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&CheckContext<'_>) -> Result<bool, PcgError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            assertion: assertion.into(),
            tolerance: 0.0,
            condition: Arc::new(condition),
        }
    }

    /// Sets the tolerance passed to the condition.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("id", &self.id)
            .field("assertion", &self.assertion)
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

/// Evaluated certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateResult {
    /// Certificate identifier.
    pub id: String,
    /// Statement that was checked.
    pub assertion: String,
    /// Tolerance used.
    pub tolerance: f64,
    /// Outcome.
    pub status: CheckStatus,
    /// Evaluation error, if the condition could not be computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
