//! Core data types for sequence input and guide design.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`alphabet`]: The accepted base letters (`A`, `T`, `G`, `C`, `N`) and
//!   composition helpers such as GC percentage and reverse complement
//! - [`SequenceRecord`](record::SequenceRecord): One parsed FASTA entry with
//!   its length and GC content
//! - [`ParseSummary`](record::ParseSummary): Aggregate statistics over a parse
//! - [`SystemId`](types::SystemId), [`InputKind`](types::InputKind): Small
//!   identifier and classification types
//!
//! ## GC Content
//!
//! | Sequence | GC content |
//! |----------|------------|
//! | `GCGC`   | 100.00     |
//! | `ATGC`   | 50.00      |
//! | `ATAT`   | 0.00       |

pub mod alphabet;
pub mod record;
pub mod types;
