use serde::{Deserialize, Serialize};

use crate::core::alphabet::{count_to_f64, gc_percent, round2};

/// One parsed FASTA entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Text following the `>` marker, trimmed
    pub header: String,

    /// Upper-cased body letters, concatenated in order of appearance
    pub sequence: String,

    /// Number of letters in `sequence`
    pub length: usize,

    /// GC percentage rounded to two decimals
    pub gc_content: f64,
}

impl SequenceRecord {
    /// Build a record, deriving `length` and `gc_content` from the sequence.
    ///
    /// The sequence is expected to be upper-case and already validated.
    #[must_use]
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        let sequence = sequence.into();
        let length = sequence.len();
        let gc_content = round2(gc_percent(&sequence));

        Self {
            header: header.into(),
            sequence,
            length,
            gc_content,
        }
    }
}

/// Aggregate statistics over all materialized records.
///
/// `average_length` and `average_gc` are `None` when no record was parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub total_sequences: usize,

    /// Mean record length, rounded to the nearest integer (halves up)
    pub average_length: Option<usize>,

    /// Mean of the per-record GC percentages, two decimals
    pub average_gc: Option<f64>,
}

impl ParseSummary {
    #[must_use]
    pub fn from_records(records: &[SequenceRecord]) -> Self {
        let total_sequences = records.len();

        if records.is_empty() {
            return Self {
                total_sequences,
                average_length: None,
                average_gc: None,
            };
        }

        let total_length: usize = records.iter().map(|r| r.length).sum();
        let average_length = (total_length + total_sequences / 2) / total_sequences;

        let total_gc: f64 = records.iter().map(|r| r.gc_content).sum();
        let average_gc = round2(total_gc / count_to_f64(total_sequences));

        Self {
            total_sequences,
            average_length: Some(average_length),
            average_gc: Some(average_gc),
        }
    }

    /// True when no record contributed to the summary
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_sequences == 0
    }
}
