use std::fmt::{self, Display};

use pcg_core::errors::{codes, PcgError};
use serde::{Deserialize, Serialize};

use crate::parameter::Reference;

/// Granularity applied to sigma before banding.
const SIGMA_ROUNDING: f64 = 1e9;

/// Qualitative agreement band for a sigma deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviationStatus {
    /// Within one standard deviation.
    Excellent,
    /// Within two standard deviations.
    Good,
    /// Within three standard deviations.
    Acceptable,
    /// Beyond three standard deviations.
    Tension,
}

impl DeviationStatus {
    /// Bands a rounded sigma value. Band edges are inclusive.
    pub fn from_sigma(sigma: f64) -> Self {
        if sigma <= 1.0 {
            DeviationStatus::Excellent
        } else if sigma <= 2.0 {
            DeviationStatus::Good
        } else if sigma <= 3.0 {
            DeviationStatus::Acceptable
        } else {
            DeviationStatus::Tension
        }
    }
}

impl Display for DeviationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeviationStatus::Excellent => "EXCELLENT",
            DeviationStatus::Good => "GOOD",
            DeviationStatus::Acceptable => "ACCEPTABLE",
            DeviationStatus::Tension => "TENSION",
        };
        f.write_str(label)
    }
}

/// Standardized residual between a computed value and a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    /// `|theory - expected| / uncertainty`, rounded to 1e-9.
    pub sigma: f64,
    /// Agreement band derived from `sigma`.
    pub status: DeviationStatus,
    /// Source of the reference value.
    pub reference_source: String,
    /// Value that was scored.
    pub theory_value: f64,
    /// Reference central value.
    pub expected_value: f64,
    /// Reference uncertainty.
    pub uncertainty: f64,
}

/// Scores `theory_value` against `reference`.
pub fn score(theory_value: f64, reference: &Reference, path: &str) -> Result<Deviation, PcgError> {
    let invalid = |message: &str| {
        PcgError::store(codes::INVALID_REFERENCE, message.to_string())
            .with_context("path", path)
            .with_context("reference_source", reference.reference_source.clone())
    };
    if !reference.uncertainty.is_finite() || reference.uncertainty <= 0.0 {
        return Err(invalid("reference uncertainty must be finite and positive")
            .with_context("uncertainty", reference.uncertainty.to_string()));
    }
    if !reference.expected_value.is_finite() {
        return Err(invalid("reference expected value must be finite"));
    }
    if !theory_value.is_finite() {
        return Err(invalid("theory value must be finite")
            .with_context("theory_value", theory_value.to_string()));
    }
    let raw = (theory_value - reference.expected_value).abs() / reference.uncertainty;
    if !raw.is_finite() {
        return Err(invalid("sigma deviation overflows")
            .with_context("uncertainty", reference.uncertainty.to_string()));
    }
    let scaled = raw * SIGMA_ROUNDING;
    let sigma = if scaled.is_finite() {
        scaled.round() / SIGMA_ROUNDING
    } else {
        raw
    };
    Ok(Deviation {
        sigma,
        status: DeviationStatus::from_sigma(sigma),
        reference_source: reference.reference_source.clone(),
        theory_value,
        expected_value: reference.expected_value,
        uncertainty: reference.uncertainty,
    })
}
