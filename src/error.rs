//! Errors raised by the coverage gate pipeline

use std::fmt;
use thiserror::Error;

/// What went wrong while walking an LCOV report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `DA:` seen while no `SF:` record is open
    StrayLineData,
    /// `SF:` seen before the previous record's `end_of_record`
    NestedRecord,
    /// `end_of_record` seen while no record is open
    UnmatchedEnd,
    /// `DA:` payload is not `<line>,<hits>`
    MalformedLineData,
    /// Input ended inside a record
    UnterminatedRecord,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseErrorKind::StrayLineData => "stray line data outside of a file record",
            ParseErrorKind::NestedRecord => "nested record, previous file record was not closed",
            ParseErrorKind::UnmatchedEnd => "unmatched end_of_record",
            ParseErrorKind::MalformedLineData => "malformed line data",
            ParseErrorKind::UnterminatedRecord => "unterminated record",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("lcov is empty!")]
    EmptyReport,

    #[error("parsing error! line {}: {}{}", .line, .kind, in_file(.file))]
    Parse {
        line: usize,
        file: Option<String>,
        kind: ParseErrorKind,
    },

    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("min_coverage must be between 0 and 100, got {0}")]
    InvalidThreshold(f64),
}

fn in_file(file: &Option<String>) -> String {
    match file {
        Some(path) => format!(" (in record for {})", path),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_message_is_fixed() {
        assert_eq!(GateError::EmptyReport.to_string(), "lcov is empty!");
    }

    #[test]
    fn test_parse_error_names_line_and_file() {
        let err = GateError::Parse {
            line: 7,
            file: Some("lib/src/bloc.dart".to_string()),
            kind: ParseErrorKind::NestedRecord,
        };
        let message = err.to_string();
        assert!(message.starts_with("parsing error! line 7"));
        assert!(message.contains("lib/src/bloc.dart"));

        let err = GateError::Parse {
            line: 1,
            file: None,
            kind: ParseErrorKind::StrayLineData,
        };
        assert_eq!(
            err.to_string(),
            "parsing error! line 1: stray line data outside of a file record"
        );
    }
}
