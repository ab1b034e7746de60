//! Covgate - line coverage gate for CI
//!
//! Reads an LCOV report and decides whether the aggregate line coverage
//! meets a minimum:
//! - LCOV parsing into per-file line records
//! - Glob based exclusion of files before aggregation
//! - Per-file and overall percentages, rounded to one decimal
//! - Pass/fail against `min_coverage`, with a listing of uncovered lines
//! - Optional pull request comment with the summary

pub mod config;
pub mod coverage;
pub mod error;
pub mod gate;
pub mod logging;
pub mod notifications;
pub mod report;

pub use coverage::{CoverageSummary, ExcludeSet, FileCoverage, LineRecord, Threshold, Verdict};
pub use error::{GateError, ParseErrorKind};
pub use gate::{run_gate, summarize, GateConfig, GateOutcome};
pub use report::{format_comment, format_failure, format_success};
