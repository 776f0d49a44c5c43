#![deny(missing_docs)]
#![doc = "Post-execution validation: certificates that gate overall success, audit gates that only log, and deterministic reports."]

/// Certificate declarations and results.
pub mod certificate;
/// Evaluation context and shared check vocabulary.
pub mod check;
/// Audit gates, clocks, and the append-only gate log.
pub mod gate;
/// Aggregated validation reports.
pub mod report;
/// Declarative YAML rule sets.
pub mod rules;
/// The validation engine.
pub mod validator;

pub use certificate::{Certificate, CertificateResult};
pub use check::{CheckContext, CheckStatus};
pub use gate::{Clock, FixedClock, Gate, GateLog, GateResult, SystemClock};
pub use report::{ValidationReport, OVERALL_PASS_PATH, VALIDATION_NAMESPACE};
pub use rules::{Comparison, RuleKind, RuleSet, RuleSpec};
pub use validator::ValidationEngine;
