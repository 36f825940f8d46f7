//! # crispr-guide
//!
//! A library for validating DNA sequence input and designing CRISPR guide RNAs.
//!
//! Input is either a bare run of bases or multi-record FASTA. It is checked
//! against the `A`/`T`/`G`/`C`/`N` alphabet, summarized (length, GC content), and
//! one sequence is selected for guide analysis. The analysis scans for
//! protospacers followed by the PAM of a CRISPR system and scores each guide.
//!
//! ## Features
//!
//! - **FASTA parsing**: Line-numbered diagnostics for invalid characters
//! - **Plain input**: Whitespace-tolerant, with positions of invalid bases
//! - **Guide discovery**: IUPAC PAM matching for any catalogued system
//! - **Scoring**: GC balance, secondary-structure potential, off-target load
//! - **Caching**: Recent analyses are memoized with a TTL
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use crispr_guide::parsing::input::select_sequence;
//! use crispr_guide::{AnalysisConfig, GuideAnalyzer, SystemCatalog};
//!
//! let selected = select_sequence(">gene\nACGTACGTAC\nGTACGTACGTTGG\n").unwrap();
//!
//! let catalog = Arc::new(SystemCatalog::load_embedded().unwrap());
//! let analyzer = GuideAnalyzer::new(catalog, AnalysisConfig::default());
//! let result = analyzer.analyze(&selected.sequence, "SpCas9", false).unwrap();
//!
//! for guide in &result.guides {
//!     println!("{} {} {:.1}", guide.position, guide.sequence, guide.efficiency_score);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Alphabet rules and record types
//! - [`parsing`]: Sequence validation, FASTA parsing and input selection
//! - [`systems`]: CRISPR system catalog and PAM patterns
//! - [`analysis`]: Guide discovery, scoring, caching and export
//! - [`config`]: Deployment environments
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for browser-based guide design

pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod parsing;
pub mod systems;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use analysis::engine::{AnalysisConfig, AnalysisError, GuideAnalyzer};
pub use analysis::guides::Guide;
pub use analysis::result::AnalysisResult;
pub use crate::core::record::{ParseSummary, SequenceRecord};
pub use crate::core::types::*;
pub use parsing::fasta::{parse_fasta, FastaError, ParsedFasta};
pub use systems::store::{CrisprSystem, SystemCatalog};
