//! Parsers and validators for user-supplied sequence text.
//!
//! This module provides:
//!
//! - **Sequence validation** ([`sequence`]): FASTA/plain classification and
//!   alphabet checks for plain input
//! - **FASTA parsing** ([`fasta`]): records, per-record statistics and a
//!   summary, or a line-numbered diagnostic
//! - **Input selection** ([`input`]): pick the sequence forwarded to guide
//!   analysis (first FASTA record, or the cleaned plain sequence)
//!
//! ## Example
//!
//! ```rust
//! use crispr_guide::parsing::fasta::parse_fasta;
//! use crispr_guide::parsing::sequence::{is_fasta_format, is_valid_sequence};
//!
//! let text = ">chr1 fragment\nATGCGC\nATAT\n";
//! assert!(is_fasta_format(text));
//!
//! let parsed = parse_fasta(text).unwrap();
//! assert_eq!(parsed.records[0].length, 10);
//!
//! assert!(is_valid_sequence("ATGCN"));
//! ```
//!
//! ## Alphabet
//!
//! | Letter | Meaning |
//! |--------|---------|
//! | A, T, G, C | Nucleotides |
//! | N | Unspecified base |
//!
//! Letters are accepted in any case and stored upper-case.

pub mod fasta;
pub mod input;
pub mod sequence;
