//! Coverage threshold validation

use super::CoverageSummary;
use crate::error::GateError;

pub const DEFAULT_MIN_COVERAGE: f64 = 100.0;

/// Minimum overall line coverage, validated to lie in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(min_coverage: f64) -> Result<Self, GateError> {
        if !(0.0..=100.0).contains(&min_coverage) {
            return Err(GateError::InvalidThreshold(min_coverage));
        }
        Ok(Self(min_coverage))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_MIN_COVERAGE)
    }
}

/// Outcome of comparing a summary against the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Pass,
    Fail { actual: f64, required: f64 },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Pass iff the overall percentage is at least the threshold
pub fn evaluate(summary: &CoverageSummary, threshold: Threshold) -> Verdict {
    let actual = summary.overall.percentage;
    let required = threshold.value();

    if actual >= required {
        Verdict::Pass
    } else {
        Verdict::Fail { actual, required }
    }
}
