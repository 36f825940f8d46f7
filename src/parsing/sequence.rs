//! Classification and alphabet validation of raw sequence text.
//!
//! Plain input is a bare run of base letters. FASTA input starts with `>` and
//! carries at least one body line.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::alphabet::{is_valid_base, trim_input, FASTA_MARKER};

/// An offending character in plain sequence input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidBase {
    /// 0-based character offset into the validated text
    pub position: usize,
    pub character: char,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid sequence: {} invalid character(s) found ({})", .0.len(), describe_invalid(.0))]
    InvalidBases(Vec<InvalidBase>),
}

/// Render up to the first ten invalid bases as `'X' at 3, 'Z' at 7, ...`
fn describe_invalid(invalid: &[InvalidBase]) -> String {
    const SHOWN: usize = 10;

    let mut parts: Vec<String> = invalid
        .iter()
        .take(SHOWN)
        .map(|b| format!("'{}' at {}", b.character.escape_default(), b.position))
        .collect();
    if invalid.len() > SHOWN {
        parts.push(format!("and {} more", invalid.len() - SHOWN));
    }
    parts.join(", ")
}

/// Check whether text is FASTA with at least one body line.
///
/// Text that starts with `>` but has no sequence lines after the first header
/// is not considered FASTA. Surrounding whitespace and a byte-order mark are
/// ignored.
///
/// # Examples
///
/// ```
/// use crispr_guide::parsing::sequence::is_fasta_format;
///
/// assert!(is_fasta_format(">seq1\nATGC\n"));
/// assert!(!is_fasta_format(">seq1\n>seq2\n"));
/// assert!(!is_fasta_format("ATGC"));
/// ```
#[must_use]
pub fn is_fasta_format(text: &str) -> bool {
    let trimmed = trim_input(text);
    if !trimmed.starts_with(FASTA_MARKER) {
        return false;
    }

    trimmed.lines().skip(1).any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with(FASTA_MARKER)
    })
}

/// Check that every character is one of `A`, `T`, `G`, `C`, `N` (any case).
///
/// The empty string is vacuously valid; callers that need a non-empty
/// sequence must check that separately.
#[must_use]
pub fn is_valid_sequence(text: &str) -> bool {
    text.chars().all(is_valid_base)
}

/// List every character outside the alphabet with its position
#[must_use]
pub fn find_invalid_bases(text: &str) -> Vec<InvalidBase> {
    text.chars()
        .enumerate()
        .filter(|(_, c)| !is_valid_base(*c))
        .map(|(position, character)| InvalidBase {
            position,
            character,
        })
        .collect()
}

/// Validate a plain sequence, reporting which characters are invalid and where.
///
/// # Errors
///
/// Returns `SequenceError::InvalidBases` if any character is outside the alphabet.
pub fn validate_sequence(text: &str) -> Result<(), SequenceError> {
    if is_valid_sequence(text) {
        return Ok(());
    }

    let invalid = find_invalid_bases(text);
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(SequenceError::InvalidBases(invalid))
    }
}

/// Remove all whitespace (and a leading byte-order mark) and upper-case the
/// remaining characters
#[must_use]
pub fn clean_sequence(text: &str) -> String {
    trim_input(text)
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fasta_format() {
        assert!(is_fasta_format(">seq1\nATGC"));
        assert!(is_fasta_format("  \n>seq1 description\n\nATGC\n"));
        assert!(is_fasta_format(">a\n>b\nATGC"));

        // Marker present but no body anywhere
        assert!(!is_fasta_format(">seq1"));
        assert!(!is_fasta_format(">seq1\n\n>seq2\n   \n"));

        // Not starting with the marker
        assert!(!is_fasta_format("ATGC\n>seq1\nATGC"));
        assert!(!is_fasta_format(""));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        assert!(is_fasta_format("\u{feff}>seq1\nATGC\n"));
        assert_eq!(clean_sequence("\u{feff}atgc\n"), "ATGC");
        assert!(validate_sequence(&clean_sequence("\u{feff}ATGC")).is_ok());
    }

    #[test]
    fn test_is_valid_sequence() {
        assert!(is_valid_sequence("ATGCN"));
        assert!(is_valid_sequence("atgcn"));
        assert!(!is_valid_sequence("ATGCX"));
        assert!(!is_valid_sequence("ATG C"));
    }

    #[test]
    fn test_empty_sequence_is_vacuously_valid() {
        // Boundary case: the predicate does not enforce non-emptiness
        assert!(is_valid_sequence(""));
        assert!(validate_sequence("").is_ok());
    }

    #[test]
    fn test_find_invalid_bases_reports_positions() {
        let invalid = find_invalid_bases("ATXGCZ");
        assert_eq!(
            invalid,
            vec![
                InvalidBase {
                    position: 2,
                    character: 'X'
                },
                InvalidBase {
                    position: 5,
                    character: 'Z'
                },
            ]
        );
    }

    #[test]
    fn test_validate_sequence_error_message() {
        let err = validate_sequence("ATGCX").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid sequence: 1 invalid character(s) found ('X' at 4)"
        );
    }

    #[test]
    fn test_validate_sequence_truncates_long_reports() {
        let err = validate_sequence(&"X".repeat(12)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid sequence: 12 invalid character(s)"));
        assert!(msg.ends_with("and 2 more)"));
    }

    #[test]
    fn test_clean_sequence() {
        assert_eq!(clean_sequence("  atg c\n\tgn \r\n"), "ATGCGN");
        assert_eq!(clean_sequence("   "), "");
    }
}
