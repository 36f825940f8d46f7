//! Guide RNA discovery and scoring.
//!
//! A sequence is scanned for every protospacer followed by the PAM of the
//! chosen CRISPR system. Each guide gets a GC content, a secondary-structure
//! score and a weighted efficiency score, and optionally an off-target count.
//!
//! ## Efficiency Score
//!
//! | Component | Default weight | Score |
//! |-----------|----------------|-------|
//! | GC balance | 60% | `100 - min(abs(gc - 50), 50)` |
//! | Structure | 40% | self-complementarity × 100 |
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use crispr_guide::analysis::engine::{AnalysisConfig, GuideAnalyzer};
//! use crispr_guide::systems::store::SystemCatalog;
//!
//! let catalog = Arc::new(SystemCatalog::load_embedded().unwrap());
//! let analyzer = GuideAnalyzer::new(catalog, AnalysisConfig::default());
//!
//! let result = analyzer
//!     .analyze("ACGTACGTACGTACGTACGTTGG", "SpCas9", false)
//!     .unwrap();
//! assert_eq!(result.statistics.total_guides, 1);
//! ```

pub mod engine;
pub mod export;
pub mod guides;
pub mod result;
pub mod scoring;
