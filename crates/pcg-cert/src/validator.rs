use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use pcg_core::errors::{codes, PcgError};
use pcg_core::validate_path;
use pcg_store::ParameterStore;
use tracing::{info, warn};

use crate::certificate::{Certificate, CertificateResult};
use crate::check::evaluate;
use crate::gate::{Clock, Gate, GateResult, SystemClock};
use crate::report::{ValidationReport, VALIDATION_NAMESPACE};

/// Registry of certificates and gates evaluated against a final store.
#[derive(Clone)]
pub struct ValidationEngine {
    certificates: Vec<Certificate>,
    gates: Vec<Gate>,
    ids: BTreeSet<String>,
    clock: Arc<dyn Clock>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Engine stamping gates with the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Engine stamping gates with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            certificates: Vec::new(),
            gates: Vec::new(),
            ids: BTreeSet::new(),
            clock,
        }
    }

    /// Replaces the clock.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    /// Registers a certificate. Ids are unique across certificates and gates.
    pub fn add_certificate(&mut self, certificate: Certificate) -> Result<(), PcgError> {
        self.claim(&certificate.id, "certificate")?;
        self.certificates.push(certificate);
        Ok(())
    }

    /// Registers an audit gate.
    pub fn add_gate(&mut self, gate: Gate) -> Result<(), PcgError> {
        self.claim(&gate.id, "gate")?;
        self.gates.push(gate);
        Ok(())
    }

    /// Registered certificates in declaration order.
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    /// Registered gates in declaration order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty() && self.gates.is_empty()
    }

    /// Evaluates every certificate and gate against `store`.
    ///
    /// A condition that errors is reported as `FAIL` with the error text
    /// as its note. Only certificates decide `overall_pass`.
    pub fn run_all(&self, store: &ParameterStore) -> Result<ValidationReport, PcgError> {
        let certificates: Vec<CertificateResult> = self
            .certificates
            .iter()
            .map(|certificate| {
                let (status, note) = evaluate(&certificate.condition, store, certificate.tolerance);
                if !status.passed() {
                    warn!(
                        certificate = %certificate.id,
                        note = note.as_deref().unwrap_or(""),
                        "certificate failed"
                    );
                }
                CertificateResult {
                    id: certificate.id.clone(),
                    assertion: certificate.assertion.clone(),
                    tolerance: certificate.tolerance,
                    status,
                    note,
                }
            })
            .collect();
        let gates: Vec<GateResult> = self
            .gates
            .iter()
            .map(|gate| {
                let (status, note) = evaluate(&gate.condition, store, gate.tolerance);
                info!(gate = %gate.id, status = %status, "audit gate evaluated");
                GateResult {
                    id: gate.id.clone(),
                    description: gate.description.clone(),
                    status,
                    details: gate.details.clone(),
                    timestamp: self.clock.now(),
                    note,
                }
            })
            .collect();
        let report = ValidationReport::new(store.content_hash()?, certificates, gates)?;
        info!(
            certificates = report.certificates.len(),
            gates = report.gates.len(),
            overall_pass = report.overall_pass,
            "validation finished"
        );
        Ok(report)
    }

    fn claim(&mut self, id: &str, kind: &str) -> Result<(), PcgError> {
        if id.is_empty() {
            return Err(PcgError::config(
                codes::INVALID_PATH,
                format!("{kind} identifier must not be empty"),
            ));
        }
        if let Err(err) = validate_path(&format!("{VALIDATION_NAMESPACE}.{id}")) {
            return Err(PcgError::config(
                codes::INVALID_PATH,
                format!("{kind} identifier `{id}` cannot be recorded as a parameter path"),
            )
            .with_context("id", id)
            .with_context("kind", kind)
            .with_hint(err.info().message.clone()));
        }
        if !self.ids.insert(id.to_string()) {
            return Err(PcgError::config(
                codes::DUPLICATE_CHECK,
                format!("{kind} `{id}` is already registered"),
            )
            .with_context("id", id));
        }
        Ok(())
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("certificates", &self.certificates)
            .field("gates", &self.gates)
            .finish_non_exhaustive()
    }
}
