//! Coverage module
//!
//! Provides:
//! - LCOV parsing
//! - Exclusion filtering
//! - Aggregation into per-file and overall percentages
//! - Threshold evaluation

mod aggregate;
mod exclude;
mod lcov;
mod threshold;

pub use aggregate::*;
pub use exclude::*;
pub use lcov::*;
pub use threshold::*;

/// Hit count for one source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    pub line_number: u32,
    pub hit_count: u64,
}

impl LineRecord {
    pub fn is_covered(&self) -> bool {
        self.hit_count > 0
    }
}

/// Line records for a single source file, in report order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    pub path: String,
    pub lines: Vec<LineRecord>,
}

impl FileCoverage {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            lines: Vec::new(),
        }
    }

    /// Uncovered line numbers, ascending and deduplicated
    pub fn uncovered_lines(&self) -> Vec<u32> {
        let mut uncovered: Vec<u32> = self
            .lines
            .iter()
            .filter(|l| !l.is_covered())
            .map(|l| l.line_number)
            .collect();
        uncovered.sort_unstable();
        uncovered.dedup();
        uncovered
    }
}
