//! FASTA parser with alphabet validation and per-record statistics.
//!
//! Parsing is a single pass over the lines of an in-memory string, expressed
//! as a fold of [`ParseState::step`] over the numbered lines. Each body line is
//! upper-cased and checked against the alphabet; the first line containing an
//! invalid character aborts the parse.
//!
//! A header with no body lines before the next header (or the end of input)
//! never becomes a record. This is not an error; such headers are listed in
//! [`ParsedFasta::empty_records`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::alphabet::{is_valid_base, trim_input, FASTA_MARKER};
use crate::core::record::{ParseSummary, SequenceRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FastaError {
    #[error("Invalid characters found on line {line}: {}", join_chars(.characters))]
    InvalidCharacter {
        /// 1-based line number of the offending line
        line: usize,
        /// Distinct invalid characters, in order of first appearance
        characters: Vec<char>,
    },
}

impl FastaError {
    /// Line number the error refers to
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidCharacter { line, .. } => *line,
        }
    }
}

fn join_chars(chars: &[char]) -> String {
    chars
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A header that was dropped because no sequence followed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyRecord {
    pub header: String,
    /// 1-based line number of the header line
    pub line: usize,
}

/// Successful outcome of a FASTA parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFasta {
    pub records: Vec<SequenceRecord>,
    pub summary: ParseSummary,

    /// Headers without a body, in input order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub empty_records: Vec<EmptyRecord>,
}

/// Accumulator threaded through the line fold
#[derive(Debug, Default)]
pub struct ParseState {
    records: Vec<SequenceRecord>,
    empty_records: Vec<EmptyRecord>,
    current_header: String,
    current_header_line: usize,
    current_sequence: String,
}

impl ParseState {
    /// Advance the parse by one line.
    ///
    /// # Errors
    ///
    /// Returns `FastaError::InvalidCharacter` if a body line contains a
    /// character outside the alphabet.
    pub fn step(mut self, line_number: usize, line: &str) -> Result<Self, FastaError> {
        let line = line.trim();

        if let Some(header) = line.strip_prefix(FASTA_MARKER) {
            self.flush();
            self.current_header = header.trim().to_string();
            self.current_header_line = line_number;
        } else if !line.is_empty() {
            let upper = line.to_uppercase();
            let invalid = distinct_invalid(&upper);
            if !invalid.is_empty() {
                return Err(FastaError::InvalidCharacter {
                    line: line_number,
                    characters: invalid,
                });
            }
            self.current_sequence.push_str(&upper);
        }

        Ok(self)
    }

    /// Flush the trailing record and compute the summary
    #[must_use]
    pub fn finish(mut self) -> ParsedFasta {
        self.flush();
        let summary = ParseSummary::from_records(&self.records);

        ParsedFasta {
            records: self.records,
            summary,
            empty_records: self.empty_records,
        }
    }

    /// Materialize the pending record if it has both a header and a sequence
    fn flush(&mut self) {
        let header = std::mem::take(&mut self.current_header);
        let sequence = std::mem::take(&mut self.current_sequence);

        if header.is_empty() {
            return;
        }

        if sequence.is_empty() {
            debug!(
                header = %header,
                line = self.current_header_line,
                "Dropping FASTA header without sequence"
            );
            self.empty_records.push(EmptyRecord {
                header,
                line: self.current_header_line,
            });
            return;
        }

        self.records.push(SequenceRecord::new(header, sequence));
    }
}

/// Distinct characters outside the alphabet, in order of first appearance
fn distinct_invalid(line: &str) -> Vec<char> {
    let mut invalid: Vec<char> = Vec::new();
    for c in line.chars().filter(|c| !is_valid_base(*c)) {
        if !invalid.contains(&c) {
            invalid.push(c);
        }
    }
    invalid
}

/// Parse FASTA text into records and summary statistics.
///
/// # Errors
///
/// Returns `FastaError::InvalidCharacter` for the first body line containing
/// a character other than `A`, `T`, `G`, `C` or `N` (case-insensitive).
///
/// # Examples
///
/// ```
/// use crispr_guide::parsing::fasta::parse_fasta;
///
/// let parsed = parse_fasta(">seq1\nATGC\n>seq2\nGCGCGC\n").unwrap();
/// assert_eq!(parsed.records.len(), 2);
/// assert_eq!(parsed.summary.average_length, Some(5));
/// ```
pub fn parse_fasta(text: &str) -> Result<ParsedFasta, FastaError> {
    let state = trim_input(text)
        .lines()
        .enumerate()
        .try_fold(ParseState::default(), |state, (index, line)| {
            state.step(index + 1, line)
        })?;

    let parsed = state.finish();
    debug!(
        records = parsed.records.len(),
        dropped = parsed.empty_records.len(),
        "Parsed FASTA input"
    );
    Ok(parsed)
}
