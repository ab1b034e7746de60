//! Text and Markdown rendering of coverage results

use crate::coverage::{CoverageSummary, Threshold, Totals};

pub const LINES_NOT_COVERED: &str = "Lines not covered";

/// Render the failure message followed by the uncovered lines of every file
pub fn format_failure(summary: &CoverageSummary, threshold: Threshold) -> String {
    let mut out = format!(
        "{:.1} is less than min_coverage {}\n",
        summary.overall.percentage,
        threshold.value()
    );

    let gaps: Vec<String> = summary
        .files_with_gaps()
        .map(|file| {
            let lines = file
                .uncovered
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", file.path, lines)
        })
        .collect();

    if !gaps.is_empty() {
        out.push('\n');
        out.push_str(LINES_NOT_COVERED);
        out.push('\n');
        for gap in gaps {
            out.push_str(&gap);
            out.push('\n');
        }
    }

    out
}

/// Render per-file and overall percentages
pub fn format_success(summary: &CoverageSummary) -> String {
    let mut out = String::new();

    for file in &summary.per_file {
        out.push_str(&format!("{}: {}\n", file.path, describe(&file.totals)));
    }

    out.push_str(&format!(
        "Overall coverage: {}\n",
        describe(&summary.overall)
    ));
    out
}

fn describe(totals: &Totals) -> String {
    format!(
        "{:.1}% ({}/{} lines)",
        totals.percentage, totals.covered_lines, totals.total_lines
    )
}

/// Markdown body for a pull request comment
pub fn format_comment(summary: &CoverageSummary, project_name: &str) -> String {
    let mut out = if project_name.is_empty() {
        "## Coverage Report\n\n".to_string()
    } else {
        format!("## Coverage Report: {}\n\n", project_name)
    };

    if !summary.per_file.is_empty() {
        out.push_str("| File | Lines | Covered | Missed | Coverage |\n");
        out.push_str("|:-----|------:|--------:|-------:|---------:|\n");
        for file in &summary.per_file {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} | {:.1}% |\n",
                file.path.replace('|', "\\|"),
                file.totals.total_lines,
                file.totals.covered_lines,
                file.totals.uncovered_lines(),
                file.totals.percentage
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "**Total coverage: {:.1}%** ({}/{} lines)\n",
        summary.overall.percentage, summary.overall.covered_lines, summary.overall.total_lines
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{aggregate, FileCoverage, LineRecord};
    use pretty_assertions::assert_eq;

    fn file(path: &str, lines: &[(u32, u64)]) -> FileCoverage {
        FileCoverage {
            path: path.to_string(),
            lines: lines
                .iter()
                .map(|&(line_number, hit_count)| LineRecord {
                    line_number,
                    hit_count,
                })
                .collect(),
        }
    }

    #[test]
    fn test_failure_lists_uncovered_lines_sorted() {
        let summary = aggregate(&[
            file("lib/a.dart", &[(9, 0), (3, 1), (4, 0), (1, 0)]),
            file("lib/b.dart", &[(1, 1), (2, 1)]),
            file("lib/c.dart", &[(7, 0)]),
        ]);
        let text = format_failure(&summary, Threshold::default());

        assert_eq!(
            text,
            "42.9 is less than min_coverage 100\n\
             \n\
             Lines not covered\n\
             lib/a.dart: 1, 4, 9\n\
             lib/c.dart: 7\n"
        );
    }

    #[test]
    fn test_failure_threshold_rendering() {
        let summary = aggregate(&[file("a.rs", &[(1, 1), (2, 0)])]);
        let text = format_failure(&summary, Threshold::new(97.5).unwrap());
        assert!(text.starts_with("50.0 is less than min_coverage 97.5\n"));
        let text = format_failure(&summary, Threshold::new(98.0).unwrap());
        assert!(text.starts_with("50.0 is less than min_coverage 98\n"));
    }

    #[test]
    fn test_failure_without_gaps_has_no_section() {
        let summary = aggregate(&[]);
        let text = format_failure(&summary, Threshold::default());
        assert!(!text.contains(LINES_NOT_COVERED));
    }

    #[test]
    fn test_success_summary() {
        let summary = aggregate(&[
            file("src/a.rs", &[(1, 1), (2, 1)]),
            file("src/b.rs", &[(1, 1), (2, 0), (3, 1)]),
        ]);

        assert_eq!(
            format_success(&summary),
            "src/a.rs: 100.0% (2/2 lines)\n\
             src/b.rs: 66.7% (2/3 lines)\n\
             Overall coverage: 80.0% (4/5 lines)\n"
        );
        assert!(!format_success(&summary).contains(LINES_NOT_COVERED));
    }

    #[test]
    fn test_comment_body() {
        let summary = aggregate(&[file("src/a.rs", &[(1, 1), (2, 1)])]);

        let body = format_comment(&summary, "bloc");
        assert!(body.starts_with("## Coverage Report: bloc\n"));
        assert!(body.contains("| `src/a.rs` | 2 | 2 | 0 | 100.0% |"));

        let partial = aggregate(&[file("src/b.rs", &[(1, 1), (2, 0), (3, 0)])]);
        let body = format_comment(&partial, "");
        assert!(body.contains("| `src/b.rs` | 3 | 1 | 2 | 33.3% |"));
        assert!(body.ends_with("**Total coverage: 100.0%** (2/2 lines)\n"));

        let body = format_comment(&aggregate(&[]), "");
        assert!(body.starts_with("## Coverage Report\n\n**Total coverage: 100.0%**"));
    }
}
