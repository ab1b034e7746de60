//! Reduction of file records into coverage percentages

use log::debug;

use super::FileCoverage;

/// Line totals for one scope (a file or the whole report)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub total_lines: u64,
    pub covered_lines: u64,
    pub percentage: f64,
}

impl Totals {
    pub fn new(total_lines: u64, covered_lines: u64) -> Self {
        Self {
            total_lines,
            covered_lines,
            percentage: percentage(covered_lines, total_lines),
        }
    }

    pub fn uncovered_lines(&self) -> u64 {
        self.total_lines - self.covered_lines
    }
}

/// Coverage of a single file
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub path: String,
    pub totals: Totals,
    /// Uncovered line numbers, ascending, without duplicates
    pub uncovered: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSummary {
    /// One entry per file record, in report order
    pub per_file: Vec<FileSummary>,
    pub overall: Totals,
}

impl CoverageSummary {
    /// Files with at least one uncovered line
    pub fn files_with_gaps(&self) -> impl Iterator<Item = &FileSummary> {
        self.per_file.iter().filter(|f| !f.uncovered.is_empty())
    }
}

/// Percentage rounded half-up to one decimal; an empty scope counts as 100.0
pub fn percentage(covered: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    // Integer tenths avoid float error at tie points such as 94.95
    let covered = covered as u128;
    let total = total as u128;
    let tenths = (covered * 2000 + total) / (total * 2);
    tenths as f64 / 10.0
}

/// Aggregate per-file and overall line coverage
pub fn aggregate(files: &[FileCoverage]) -> CoverageSummary {
    let per_file: Vec<FileSummary> = files
        .iter()
        .map(|file| {
            let total = file.lines.len() as u64;
            let covered = file.lines.iter().filter(|l| l.is_covered()).count() as u64;
            FileSummary {
                path: file.path.clone(),
                totals: Totals::new(total, covered),
                uncovered: file.uncovered_lines(),
            }
        })
        .collect();

    let (total, covered) = per_file.iter().fold((0u64, 0u64), |(t, c), f| {
        (t + f.totals.total_lines, c + f.totals.covered_lines)
    });
    let overall = Totals::new(total, covered);

    debug!(
        "Aggregated {} files: {}/{} lines covered ({:.1}%)",
        per_file.len(),
        covered,
        total,
        overall.percentage
    );

    CoverageSummary { per_file, overall }
}
