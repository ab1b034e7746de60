//! LCOV format parser
//!
//! The parser is a two-state machine folded over the report lines. Only the
//! `SF`, `DA` and `end_of_record` tokens carry meaning here; every other line
//! (`TN`, `FN`, `BRDA`, `LF`, ...) is skipped.

use log::debug;
use std::collections::HashMap;

use super::{FileCoverage, LineRecord};
use crate::error::{GateError, ParseErrorKind};

/// A classified report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    SourceFile(&'a str),
    LineData(&'a str),
    EndOfRecord,
    Other,
}

impl<'a> Token<'a> {
    pub fn classify(line: &'a str) -> Self {
        if let Some(path) = line.strip_prefix("SF:") {
            Token::SourceFile(path)
        } else if let Some(payload) = line.strip_prefix("DA:") {
            Token::LineData(payload)
        } else if line == "end_of_record" {
            Token::EndOfRecord
        } else {
            Token::Other
        }
    }
}

/// A file record that has been opened by `SF:` but not yet closed
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRecord {
    file: FileCoverage,
    positions: HashMap<u32, usize>,
}

impl OpenRecord {
    fn new(path: &str) -> Self {
        Self {
            file: FileCoverage::new(path),
            positions: HashMap::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }

    /// Repeated line numbers are merged by summing their hits
    fn push(&mut self, record: LineRecord) {
        match self.positions.get(&record.line_number) {
            Some(&idx) => {
                let existing = &mut self.file.lines[idx];
                existing.hit_count = existing.hit_count.saturating_add(record.hit_count);
            }
            None => {
                self.positions
                    .insert(record.line_number, self.file.lines.len());
                self.file.lines.push(record);
            }
        }
    }

    fn finish(self) -> FileCoverage {
        self.file
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParserState {
    Idle,
    InRecord(OpenRecord),
}

impl ParserState {
    /// Advance the machine by one (already trimmed) report line.
    ///
    /// Returns the next state and, when the line closed a record, the
    /// committed file.
    pub fn step(
        self,
        line_no: usize,
        line: &str,
    ) -> Result<(ParserState, Option<FileCoverage>), GateError> {
        match (self, Token::classify(line)) {
            (ParserState::Idle, Token::SourceFile(path)) => {
                Ok((ParserState::InRecord(OpenRecord::new(path)), None))
            }
            (ParserState::Idle, Token::LineData(_)) => {
                Err(parse_error(line_no, None, ParseErrorKind::StrayLineData))
            }
            (ParserState::Idle, Token::EndOfRecord) => {
                Err(parse_error(line_no, None, ParseErrorKind::UnmatchedEnd))
            }
            (ParserState::InRecord(open), Token::SourceFile(_)) => Err(parse_error(
                line_no,
                Some(open.path()),
                ParseErrorKind::NestedRecord,
            )),
            (ParserState::InRecord(mut open), Token::LineData(payload)) => {
                let record = parse_line_data(payload).ok_or_else(|| {
                    parse_error(line_no, Some(open.path()), ParseErrorKind::MalformedLineData)
                })?;
                open.push(record);
                Ok((ParserState::InRecord(open), None))
            }
            (ParserState::InRecord(open), Token::EndOfRecord) => {
                Ok((ParserState::Idle, Some(open.finish())))
            }
            (state, Token::Other) => Ok((state, None)),
        }
    }
}

fn parse_error(line: usize, file: Option<&str>, kind: ParseErrorKind) -> GateError {
    GateError::Parse {
        line,
        file: file.map(str::to_string),
        kind,
    }
}

/// Parse the payload of a `DA:` line: `<line>,<hits>[,<checksum>]`
fn parse_line_data(payload: &str) -> Option<LineRecord> {
    let mut fields = payload.split(',');
    let line_number = fields.next()?.trim().parse::<u32>().ok()?;
    let hit_count = fields.next()?.trim().parse::<u64>().ok()?;

    // An optional checksum may follow; anything beyond it is malformed
    let _checksum = fields.next();
    if fields.next().is_some() || line_number == 0 {
        return None;
    }

    Some(LineRecord {
        line_number,
        hit_count,
    })
}

/// Parse LCOV content into file records, in report order
pub fn parse(content: &str) -> Result<Vec<FileCoverage>, GateError> {
    if content.trim().is_empty() {
        return Err(GateError::EmptyReport);
    }

    let (state, files, line_count) = content.lines().enumerate().try_fold(
        (ParserState::Idle, Vec::new(), 0usize),
        |(state, mut files, _), (idx, line)| {
            let (next, committed) = state.step(idx + 1, line.trim())?;
            files.extend(committed);
            Ok::<_, GateError>((next, files, idx + 1))
        },
    )?;

    if let ParserState::InRecord(open) = state {
        return Err(parse_error(
            line_count,
            Some(open.path()),
            ParseErrorKind::UnterminatedRecord,
        ));
    }

    if files.is_empty() {
        return Err(GateError::EmptyReport);
    }

    debug!("Parsed {} file records from {} lines", files.len(), line_count);
    Ok(files)
}
