//! Turn raw user input into the single sequence forwarded to guide analysis.
//!
//! Input starting with `>` is parsed as FASTA and the first record is chosen;
//! anything else is treated as a plain sequence, stripped of whitespace and
//! upper-cased. A leading byte-order mark is ignored.
//!
//! FASTA input whose headers carry no body lines fails
//! [`is_fasta_format`]; it is reported as headers-only rather than being
//! validated as a plain sequence.

use serde::Serialize;
use thiserror::Error;

use crate::core::alphabet::{trim_input, FASTA_MARKER};
use crate::core::record::{ParseSummary, SequenceRecord};
use crate::core::types::InputKind;
use crate::parsing::fasta::{parse_fasta, EmptyRecord, FastaError};
use crate::parsing::sequence::{clean_sequence, is_fasta_format, validate_sequence, SequenceError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("No sequence provided")]
    Empty,

    #[error(transparent)]
    Fasta(#[from] FastaError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("No sequences found in FASTA input")]
    NoRecords,

    #[error("FASTA input has headers but no sequence lines")]
    HeadersOnly,

    #[error("Record index {index} out of range: input has {available} record(s)")]
    RecordOutOfRange { index: usize, available: usize },
}

/// The sequence picked from user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedSequence {
    pub kind: InputKind,

    /// FASTA header of the chosen record; `None` for plain input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Upper-case, validated sequence
    pub sequence: String,

    /// Number of records the input contained (1 for plain input)
    pub record_count: usize,
}

/// Decide whether text is routed to the FASTA parser or treated as plain.
///
/// Routing only looks at the leading `>`, so headers-only text still goes to
/// the FASTA parser; see [`is_fasta_format`] for the stricter check.
#[must_use]
pub fn classify(text: &str) -> InputKind {
    if trim_input(text).starts_with(FASTA_MARKER) {
        InputKind::Fasta
    } else {
        InputKind::Plain
    }
}

/// Select the first sequence from the input.
///
/// # Errors
///
/// Returns `InputError` if the input is empty, fails validation, or is FASTA
/// without any record.
pub fn select_sequence(text: &str) -> Result<SelectedSequence, InputError> {
    select_record(text, 0)
}

/// Select the record at `index` (0-based) from the input.
///
/// For plain input only index 0 exists.
///
/// # Errors
///
/// Returns `InputError` if the input is empty, fails validation, has only
/// headers, has no records, or has fewer than `index + 1` records.
pub fn select_record(text: &str, index: usize) -> Result<SelectedSequence, InputError> {
    match classify(text) {
        InputKind::Fasta => {
            if !is_fasta_format(text) {
                return Err(InputError::HeadersOnly);
            }

            let parsed = parse_fasta(text)?;
            let available = parsed.records.len();
            if available == 0 {
                return Err(InputError::NoRecords);
            }

            let record = parsed
                .records
                .into_iter()
                .nth(index)
                .ok_or(InputError::RecordOutOfRange { index, available })?;

            Ok(SelectedSequence {
                kind: InputKind::Fasta,
                header: Some(record.header),
                sequence: record.sequence,
                record_count: available,
            })
        }
        InputKind::Plain => {
            let sequence = clean_sequence(text);
            if sequence.is_empty() {
                return Err(InputError::Empty);
            }
            validate_sequence(&sequence)?;
            if index > 0 {
                return Err(InputError::RecordOutOfRange {
                    index,
                    available: 1,
                });
            }

            Ok(SelectedSequence {
                kind: InputKind::Plain,
                header: None,
                sequence,
                record_count: 1,
            })
        }
    }
}

/// Every sequence found in the input, with summary statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputReport {
    pub kind: InputKind,
    pub sequences: Vec<SequenceRecord>,
    pub summary: ParseSummary,
    pub empty_records: Vec<EmptyRecord>,
    /// FASTA input in which no header is followed by a sequence line
    pub headers_only: bool,
}

/// Validate input and describe all of its sequences.
///
/// Plain input yields a single record with an empty header. Unlike
/// `select_sequence`, FASTA input without records is not an error; headers-only
/// input is flagged with `headers_only`.
///
/// # Errors
///
/// Returns `InputError` if the input is empty or fails validation.
pub fn inspect(text: &str) -> Result<InputReport, InputError> {
    match classify(text) {
        InputKind::Fasta => {
            let parsed = parse_fasta(text)?;
            Ok(InputReport {
                kind: InputKind::Fasta,
                sequences: parsed.records,
                summary: parsed.summary,
                empty_records: parsed.empty_records,
                headers_only: !is_fasta_format(text),
            })
        }
        InputKind::Plain => {
            let sequence = clean_sequence(text);
            if sequence.is_empty() {
                return Err(InputError::Empty);
            }
            validate_sequence(&sequence)?;

            let sequences = vec![SequenceRecord::new("", sequence)];
            Ok(InputReport {
                kind: InputKind::Plain,
                summary: ParseSummary::from_records(&sequences),
                sequences,
                empty_records: Vec::new(),
                headers_only: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(">a\nATGC"), InputKind::Fasta);
        assert_eq!(classify("  \n>a\nATGC"), InputKind::Fasta);
        assert_eq!(classify("ATGC"), InputKind::Plain);
        assert_eq!(classify(""), InputKind::Plain);
        assert_eq!(classify("\u{feff}>a\nATGC"), InputKind::Fasta);
    }

    #[test]
    fn test_byte_order_mark_prefixed_fasta() {
        let text = "\u{feff}>seq1\nACGTACGTACGTACGTACGTTGG\n";
        let selected = select_sequence(text).unwrap();
        assert_eq!(selected.kind, InputKind::Fasta);
        assert_eq!(selected.header.as_deref(), Some("seq1"));
        assert_eq!(selected.sequence, "ACGTACGTACGTACGTACGTTGG");

        let report = inspect(text).unwrap();
        assert!(!report.headers_only);
        assert_eq!(report.sequences.len(), 1);
    }

    #[test]
    fn test_byte_order_mark_prefixed_plain() {
        let selected = select_sequence("\u{feff}atgc\n").unwrap();
        assert_eq!(selected.kind, InputKind::Plain);
        assert_eq!(selected.sequence, "ATGC");
    }

    #[test]
    fn test_select_first_fasta_record() {
        let selected = select_sequence(">first\natgc\n>second\nGGGG\n").unwrap();
        assert_eq!(selected.kind, InputKind::Fasta);
        assert_eq!(selected.header.as_deref(), Some("first"));
        assert_eq!(selected.sequence, "ATGC");
        assert_eq!(selected.record_count, 2);
    }

    #[test]
    fn test_select_record_by_index() {
        let selected = select_record(">first\nATGC\n>second\nGGGG\n", 1).unwrap();
        assert_eq!(selected.header.as_deref(), Some("second"));

        let err = select_record(">first\nATGC\n", 3).unwrap_err();
        assert_eq!(
            err,
            InputError::RecordOutOfRange {
                index: 3,
                available: 1
            }
        );
    }

    #[test]
    fn test_select_plain_sequence_is_cleaned() {
        let selected = select_sequence("  atgc\nATGC  nn\n").unwrap();
        assert_eq!(selected.kind, InputKind::Plain);
        assert_eq!(selected.header, None);
        assert_eq!(selected.sequence, "ATGCATGCNN");
    }

    #[test]
    fn test_select_errors() {
        assert_eq!(select_sequence("   \n").unwrap_err(), InputError::Empty);
        assert_eq!(select_sequence(">a\n>b\n").unwrap_err(), InputError::HeadersOnly);
        // Body lines exist, but the only header is empty
        assert_eq!(select_sequence(">\nATGC\n").unwrap_err(), InputError::NoRecords);
        assert!(matches!(
            select_sequence(">a\nATXG\n").unwrap_err(),
            InputError::Fasta(FastaError::InvalidCharacter { line: 2, .. })
        ));
        assert!(matches!(
            select_sequence("ATGU").unwrap_err(),
            InputError::Sequence(SequenceError::InvalidBases(_))
        ));
    }

    #[test]
    fn test_inspect_fasta() {
        let report = inspect(">a\nATGC\n>empty\n>b\nGGCC\n").unwrap();
        assert_eq!(report.kind, InputKind::Fasta);
        assert_eq!(report.sequences.len(), 2);
        assert_eq!(report.summary.total_sequences, 2);
        assert_eq!(report.empty_records.len(), 1);
        assert_eq!(report.empty_records[0].header, "empty");
    }

    #[test]
    fn test_inspect_plain() {
        let report = inspect("atgc gcgc").unwrap();
        assert_eq!(report.kind, InputKind::Plain);
        assert_eq!(report.sequences.len(), 1);
        assert_eq!(report.sequences[0].header, "");
        assert_eq!(report.sequences[0].sequence, "ATGCGCGC");
        assert_eq!(report.summary.average_length, Some(8));
        assert!(!report.headers_only);
    }

    #[test]
    fn test_inspect_headers_only_is_not_an_error() {
        let report = inspect(">a\n>b\n").unwrap();
        assert_eq!(report.kind, InputKind::Fasta);
        assert!(report.headers_only);
        assert!(report.sequences.is_empty());
        assert_eq!(report.empty_records.len(), 2);
        assert_eq!(report.summary.average_length, None);
        assert_eq!(inspect("").unwrap_err(), InputError::Empty);
    }
}
