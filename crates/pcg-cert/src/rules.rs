use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use pcg_core::errors::{codes, PcgError};
use pcg_core::serde::from_yaml_slice;
use pcg_core::{validate_path, Status, Value};
use serde::{Deserialize, Serialize};

use crate::certificate::Certificate;
use crate::check::CheckContext;
use crate::gate::Gate;
use crate::validator::ValidationEngine;

/// Comparison operator for threshold rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Strictly greater.
    Gt,
    /// Greater or equal, widened by the tolerance.
    Ge,
    /// Strictly less.
    Lt,
    /// Less or equal, widened by the tolerance.
    Le,
}

impl Comparison {
    fn holds(self, actual: f64, bound: f64, tolerance: f64) -> bool {
        match self {
            Comparison::Gt => actual > bound,
            Comparison::Ge => actual >= bound - tolerance,
            Comparison::Lt => actual < bound,
            Comparison::Le => actual <= bound + tolerance,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
        }
    }
}

/// Condition shape of a declarative rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// Numeric value compared against a bound.
    Threshold {
        /// Parameter to read.
        path: String,
        /// Operator.
        op: Comparison,
        /// Bound.
        value: f64,
    },
    /// Numeric value equal to `value` within the tolerance.
    Equals {
        /// Parameter to read.
        path: String,
        /// Expected value.
        value: f64,
    },
    /// Deviation from the attached reference at most `max_sigma`.
    Deviation {
        /// Parameter to score.
        path: String,
        /// Largest accepted sigma.
        max_sigma: f64,
    },
    /// Parameter exists.
    Present {
        /// Parameter to look up.
        path: String,
    },
    /// Parameter trust class is at least `status`.
    MinTrust {
        /// Parameter to inspect.
        path: String,
        /// Weakest accepted class.
        status: Status,
    },
}

impl RuleKind {
    /// Parameter the rule inspects.
    pub fn path(&self) -> &str {
        match self {
            RuleKind::Threshold { path, .. }
            | RuleKind::Equals { path, .. }
            | RuleKind::Deviation { path, .. }
            | RuleKind::Present { path }
            | RuleKind::MinTrust { path, .. } => path,
        }
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<bool, PcgError> {
        match self {
            RuleKind::Threshold { path, op, value } => {
                Ok(op.holds(ctx.number(path)?, *value, ctx.tolerance()))
            }
            RuleKind::Equals { path, value } => Ok(ctx.within(ctx.number(path)?, *value)),
            RuleKind::Deviation { path, max_sigma } => Ok(ctx.deviation(path)?.sigma <= *max_sigma),
            RuleKind::Present { path } => Ok(ctx.store().has(path)),
            RuleKind::MinTrust { path, status } => Ok(ctx.status(path)?.at_least(*status)),
        }
    }
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Threshold { path, op, value } => write!(f, "{path} {} {value}", op.symbol()),
            RuleKind::Equals { path, value } => write!(f, "{path} == {value}"),
            RuleKind::Deviation { path, max_sigma } => write!(f, "deviation({path}) <= {max_sigma} sigma"),
            RuleKind::Present { path } => write!(f, "{path} is present"),
            RuleKind::MinTrust { path, status } => write!(f, "status({path}) at least {status}"),
        }
    }
}

/// One declarative certificate or gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Identifier of the resulting certificate or gate.
    pub id: String,
    /// Statement shown in reports; derived from the rule when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,
    /// Condition.
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Tolerance for `equals`, `ge` and `le`.
    #[serde(default)]
    pub tolerance: f64,
    /// Registers the rule as an audit gate instead of a certificate.
    #[serde(default)]
    pub gate: bool,
    /// Details copied onto gate results.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

impl RuleSpec {
    fn statement(&self) -> String {
        self.assertion
            .clone()
            .unwrap_or_else(|| self.kind.to_string())
    }

    fn validate(&self) -> Result<(), PcgError> {
        validate_path(self.kind.path()).map_err(|err| err.with_context("rule", self.id.as_str()))?;
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(PcgError::config(
                codes::TYPE_MISMATCH,
                format!("rule `{}` has an invalid tolerance", self.id),
            )
            .with_context("rule", self.id.as_str())
            .with_hint("tolerance must be a finite, non-negative number"));
        }
        Ok(())
    }

    fn register(self, engine: &mut ValidationEngine) -> Result<(), PcgError> {
        self.validate()?;
        let statement = self.statement();
        let kind = self.kind;
        if self.gate {
            let mut gate = Gate::new(self.id, statement, move |ctx: &CheckContext<'_>| {
                kind.check(ctx)
            })
            .with_tolerance(self.tolerance);
            gate.details = self.details;
            engine.add_gate(gate)
        } else {
            let certificate = Certificate::new(self.id, statement, move |ctx: &CheckContext<'_>| {
                kind.check(ctx)
            });
            engine.add_certificate(certificate.with_tolerance(self.tolerance))
        }
    }
}

/// Declarative validation rules loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rules in declaration order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl RuleSet {
    /// Parses a rule set from YAML bytes.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, PcgError> {
        from_yaml_slice(data)
    }

    /// Reads and parses a rule set file.
    pub fn load(path: &Path) -> Result<Self, PcgError> {
        let data = std::fs::read(path).map_err(|err| {
            PcgError::config("rules_read", format!("failed to read rules: {err}"))
                .with_context("file", path.display().to_string())
        })?;
        Self::from_yaml_slice(&data)
    }

    /// Adds every rule to `engine` in declaration order.
    pub fn register_into(self, engine: &mut ValidationEngine) -> Result<(), PcgError> {
        for rule in self.rules {
            rule.register(engine)?;
        }
        Ok(())
    }

    /// Builds a wall-clock engine holding every rule.
    pub fn into_engine(self) -> Result<ValidationEngine, PcgError> {
        let mut engine = ValidationEngine::new();
        self.register_into(&mut engine)?;
        Ok(engine)
    }
}
