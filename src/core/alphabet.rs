//! Nucleotide alphabet rules shared by the validator, the FASTA parser and the
//! guide analysis.

/// Marker that introduces a FASTA record header line
pub const FASTA_MARKER: char = '>';

/// The accepted sequence letters. `N` stands for an unspecified base.
pub const VALID_BASES: [char; 5] = ['A', 'T', 'G', 'C', 'N'];

/// UTF-8 byte-order mark some editors write at the start of text files
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Trim whitespace and byte-order marks from both ends of input text.
///
/// # Examples
///
/// ```
/// use crispr_guide::core::alphabet::trim_input;
///
/// assert_eq!(trim_input("\u{feff}>seq1\nATGC\n"), ">seq1\nATGC");
/// assert_eq!(trim_input("  ATGC \n"), "ATGC");
/// ```
#[must_use]
pub fn trim_input(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
}

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Check whether a character belongs to the alphabet, ignoring case.
///
/// # Examples
///
/// ```
/// use crispr_guide::core::alphabet::is_valid_base;
///
/// assert!(is_valid_base('a'));
/// assert!(is_valid_base('N'));
/// assert!(!is_valid_base('X'));
/// ```
#[must_use]
pub fn is_valid_base(c: char) -> bool {
    VALID_BASES.contains(&c.to_ascii_uppercase())
}

/// Percentage (0-100) of letters that are `G` or `C`, unrounded.
///
/// Returns 0.0 for an empty sequence.
#[must_use]
pub fn gc_percent(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }

    let gc = sequence
        .bytes()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count();

    count_to_f64(gc) / count_to_f64(sequence.len()) * 100.0
}

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Complement of a single base. `N` and anything outside the alphabet map to themselves.
#[must_use]
pub fn complement(base: char) -> char {
    match base.to_ascii_uppercase() {
        'A' => 'T',
        'T' => 'A',
        'G' => 'C',
        'C' => 'G',
        _ => base,
    }
}

/// Reverse complement of a sequence
#[must_use]
pub fn reverse_complement(sequence: &str) -> String {
    sequence.chars().rev().map(complement).collect()
}
