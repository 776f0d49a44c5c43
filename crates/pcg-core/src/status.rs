//! Trust classification attached to every stored parameter.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{codes, PcgError};

/// Closed set of trust classes forming a partial order.
///
/// `MEASURED > ESTABLISHED > {GEOMETRIC, DERIVED, PREDICTED} > CALIBRATED >
/// {VALIDATION, SYSTEM}`. Classes on the same tier are incomparable peers and
/// share a [`Status::trust_rank`]. Compare with [`Status::trust_rank`] or
/// [`Status::at_least`]; declaration order carries no meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// External ground truth.
    Measured,
    /// Accepted literature constant.
    Established,
    /// Computed from geometric construction.
    Geometric,
    /// Computed by a unit.
    #[default]
    Derived,
    /// Computed forecast awaiting comparison.
    Predicted,
    /// Computed, but at least one ingredient was fit to a reference.
    Calibrated,
    /// Meta-value produced by the validator.
    Validation,
    /// Meta-value describing the session itself.
    System,
}

impl Status {
    /// Every status in declaration order.
    pub const ALL: [Status; 8] = [
        Status::Measured,
        Status::Established,
        Status::Geometric,
        Status::Derived,
        Status::Predicted,
        Status::Calibrated,
        Status::Validation,
        Status::System,
    ];

    /// Numeric tier in the trust order; higher is more trusted.
    pub const fn trust_rank(self) -> u8 {
        match self {
            Status::Measured => 4,
            Status::Established => 3,
            Status::Geometric | Status::Derived | Status::Predicted => 2,
            Status::Calibrated => 1,
            Status::Validation | Status::System => 0,
        }
    }

    /// Entries with this status can never be overwritten once written.
    pub const fn is_immutable(self) -> bool {
        matches!(self, Status::Measured | Status::Established)
    }

    /// Whether the value was computed by a unit.
    pub const fn is_computed(self) -> bool {
        matches!(
            self,
            Status::Geometric | Status::Derived | Status::Predicted | Status::Calibrated
        )
    }

    /// Whether the value was produced by the validation layer.
    pub const fn is_meta(self) -> bool {
        matches!(self, Status::Validation | Status::System)
    }

    /// Returns true when `self` sits on the same or a higher trust tier than `other`.
    pub const fn at_least(self, other: Status) -> bool {
        self.trust_rank() >= other.trust_rank()
    }

    /// Upper-case label used in serialized payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Measured => "MEASURED",
            Status::Established => "ESTABLISHED",
            Status::Geometric => "GEOMETRIC",
            Status::Derived => "DERIVED",
            Status::Predicted => "PREDICTED",
            Status::Calibrated => "CALIBRATED",
            Status::Validation => "VALIDATION",
            Status::System => "SYSTEM",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = PcgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                PcgError::serde(codes::TYPE_MISMATCH, format!("unknown status `{s}`"))
                    .with_hint("expected one of MEASURED, ESTABLISHED, GEOMETRIC, DERIVED, PREDICTED, CALIBRATED, VALIDATION, SYSTEM")
            })
    }
}
