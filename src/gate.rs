//! The coverage gate pipeline: parse, filter, aggregate, evaluate, format

use log::{debug, info};

use crate::coverage::{
    aggregate, evaluate, filter, parse, CoverageSummary, ExcludeSet, Threshold, Verdict,
};
use crate::error::GateError;
use crate::report::format_failure;

/// Everything the pipeline needs besides the report text
#[derive(Debug, Clone, Default)]
pub struct GateConfig {
    pub threshold: Threshold,
    pub exclude: ExcludeSet,
    /// Label for rendered comments, not used in computation
    pub project_name: String,
}

impl GateConfig {
    pub fn new<I, S>(
        min_coverage: Option<f64>,
        exclude: I,
        project_name: &str,
    ) -> Result<Self, GateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let threshold = match min_coverage {
            Some(min) => Threshold::new(min)?,
            None => Threshold::default(),
        };

        Ok(Self {
            threshold,
            exclude: ExcludeSet::new(exclude)?,
            project_name: project_name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    Pass {
        summary: CoverageSummary,
    },
    Fail {
        summary: CoverageSummary,
        verdict: Verdict,
        /// Failure text including the uncovered line listing
        message: String,
    },
}

impl GateOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, GateOutcome::Pass { .. })
    }

    pub fn summary(&self) -> &CoverageSummary {
        match self {
            GateOutcome::Pass { summary } | GateOutcome::Fail { summary, .. } => summary,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Parse, filter and aggregate a report without judging it
pub fn summarize(report: &str, exclude: &ExcludeSet) -> Result<CoverageSummary, GateError> {
    let files = parse(report)?;
    let kept = filter(&files, exclude);
    Ok(aggregate(&kept))
}

/// Run the full gate over the report text
pub fn run_gate(report: &str, config: &GateConfig) -> Result<GateOutcome, GateError> {
    let summary = summarize(report, &config.exclude)?;

    let verdict = evaluate(&summary, config.threshold);
    debug!("Verdict: {:?}", verdict);

    match verdict {
        Verdict::Pass => {
            info!(
                "Coverage {:.1}% meets min_coverage {}",
                summary.overall.percentage,
                config.threshold.value()
            );
            Ok(GateOutcome::Pass { summary })
        }
        Verdict::Fail { .. } => {
            let message = format_failure(&summary, config.threshold);
            Ok(GateOutcome::Fail {
                summary,
                verdict,
                message,
            })
        }
    }
}
