use std::collections::BTreeMap;

use pcg_core::errors::PcgError;
use pcg_core::serde::to_canonical_json_bytes;
use pcg_core::{stable_hash_string, Status, Value, VALIDATOR_SOURCE};
use pcg_store::ParameterStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::certificate::CertificateResult;
use crate::check::CheckStatus;
use crate::gate::GateResult;

/// Path under which the overall verdict is recorded.
pub const OVERALL_PASS_PATH: &str = "system.overall_pass";
/// Namespace under which per-certificate outcomes are recorded.
pub const VALIDATION_NAMESPACE: &str = "validation";

/// Gate outcome as it enters the report hash.
#[derive(Serialize)]
struct HashedGate<'a> {
    id: &'a str,
    status: CheckStatus,
    details: &'a BTreeMap<String, Value>,
    note: &'a Option<String>,
}

/// Aggregated outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Hash over certificate and gate outcomes plus the store hash, excluding timestamps.
    pub analysis_hash: String,
    /// Content hash of the validated store.
    pub store_hash: String,
    /// Certificate results in declaration order.
    pub certificates: Vec<CertificateResult>,
    /// Gate results in declaration order.
    pub gates: Vec<GateResult>,
    /// True iff every certificate passed. Gates never contribute.
    pub overall_pass: bool,
}

impl ValidationReport {
    /// Assembles a report and computes its hash.
    pub fn new(
        store_hash: String,
        certificates: Vec<CertificateResult>,
        gates: Vec<GateResult>,
    ) -> Result<Self, PcgError> {
        let overall_pass = certificates.iter().all(|result| result.status.passed());
        let hashed_gates: Vec<HashedGate<'_>> = gates
            .iter()
            .map(|gate| HashedGate {
                id: &gate.id,
                status: gate.status,
                details: &gate.details,
                note: &gate.note,
            })
            .collect();
        let analysis_hash =
            stable_hash_string(&(&store_hash, &certificates, &hashed_gates, overall_pass))?;
        Ok(Self {
            analysis_hash,
            store_hash,
            certificates,
            gates,
            overall_pass,
        })
    }

    /// Certificates that did not pass.
    pub fn failed_certificates(&self) -> impl Iterator<Item = &CertificateResult> {
        self.certificates
            .iter()
            .filter(|result| !result.status.passed())
    }

    /// Gates that did not pass.
    pub fn failed_gates(&self) -> impl Iterator<Item = &GateResult> {
        self.gates.iter().filter(|result| !result.status.passed())
    }

    /// Looks up a certificate result by id.
    pub fn certificate(&self, id: &str) -> Option<&CertificateResult> {
        self.certificates.iter().find(|result| result.id == id)
    }

    /// Looks up a gate result by id.
    pub fn gate(&self, id: &str) -> Option<&GateResult> {
        self.gates.iter().find(|result| result.id == id)
    }

    /// Writes `validation.<id>` for every certificate and the overall
    /// verdict at `system.overall_pass`, all under the validator source.
    pub fn record_into(&self, store: &mut ParameterStore) -> Result<(), PcgError> {
        for result in &self.certificates {
            let path = format!("{VALIDATION_NAMESPACE}.{}", result.id);
            store.put(
                &path,
                result.status.passed(),
                VALIDATOR_SOURCE,
                Status::Validation,
                None,
                None,
            )?;
        }
        store.put(
            OVERALL_PASS_PATH,
            self.overall_pass,
            VALIDATOR_SOURCE,
            Status::System,
            None,
            None,
        )?;
        debug!(
            certificates = self.certificates.len(),
            overall_pass = self.overall_pass,
            "validation outcome recorded"
        );
        Ok(())
    }

    /// Canonical JSON form of the report.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PcgError> {
        to_canonical_json_bytes(self)
    }
}
