use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::guides::{annotate_off_targets, find_guides};
use crate::analysis::result::AnalysisResult;
use crate::analysis::scoring::ScoringWeights;
use crate::systems::pam::PamError;
use crate::systems::store::SystemCatalog;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unknown CRISPR system '{name}' (available: {available})")]
    UnknownSystem { name: String, available: String },

    #[error("Sequence too short: {length} bases (minimum {min})")]
    SequenceTooShort { length: usize, min: usize },

    #[error("Sequence too long: {length} bases (maximum {max})")]
    SequenceTooLong { length: usize, max: usize },

    #[error("Invalid PAM for system '{system}': {source}")]
    InvalidPam {
        system: String,
        #[source]
        source: PamError,
    },
}

/// Analyzer limits and scoring parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub min_sequence_length: usize,
    pub max_sequence_length: usize,
    pub scoring_weights: ScoringWeights,
    /// How long a cached result stays valid
    pub cache_timeout: Duration,
    /// Zero disables caching
    pub max_cache_entries: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_sequence_length: 20,
            max_sequence_length: 200_000,
            scoring_weights: ScoringWeights::default(),
            cache_timeout: Duration::from_secs(300),
            max_cache_entries: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    sequence: String,
    system: String,
    off_targets: bool,
}

#[derive(Debug)]
struct CacheEntry {
    result: Arc<AnalysisResult>,
    stored_at: Instant,
}

/// Finds and scores guides, memoizing recent results.
///
/// Safe to share between threads; the cache sits behind a `Mutex`.
#[derive(Debug)]
pub struct GuideAnalyzer {
    catalog: Arc<SystemCatalog>,
    config: AnalysisConfig,
    cache: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl GuideAnalyzer {
    #[must_use]
    pub fn new(catalog: Arc<SystemCatalog>, config: AnalysisConfig) -> Self {
        Self {
            catalog,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &SystemCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze an upper-case, validated sequence with the named system.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` if the system is unknown or the sequence length
    /// is outside the configured bounds.
    pub fn analyze(
        &self,
        sequence: &str,
        system: &str,
        off_targets: bool,
    ) -> Result<Arc<AnalysisResult>, AnalysisError> {
        let crispr = self
            .catalog
            .get(system)
            .ok_or_else(|| AnalysisError::UnknownSystem {
                name: system.to_string(),
                available: self.catalog.names().join(", "),
            })?;

        let length = sequence.len();
        if length < self.config.min_sequence_length {
            return Err(AnalysisError::SequenceTooShort {
                length,
                min: self.config.min_sequence_length,
            });
        }
        if length > self.config.max_sequence_length {
            return Err(AnalysisError::SequenceTooLong {
                length,
                max: self.config.max_sequence_length,
            });
        }

        let key = CacheKey {
            sequence: sequence.to_string(),
            system: system.to_string(),
            off_targets,
        };
        if let Some(hit) = self.cached(&key) {
            debug!(system, length, "Analysis cache hit");
            return Ok(hit);
        }

        let pam = crispr
            .pam_pattern()
            .map_err(|source| AnalysisError::InvalidPam {
                system: system.to_string(),
                source,
            })?;

        let mut guides = find_guides(
            sequence,
            &pam,
            crispr.guide_length,
            &self.config.scoring_weights,
        );
        if off_targets {
            annotate_off_targets(&mut guides, sequence, &self.config.scoring_weights);
        }

        let result = Arc::new(AnalysisResult::from_guides(guides));
        info!(
            system,
            length,
            guides = result.statistics.total_guides,
            "Analysis complete"
        );

        self.store(key, Arc::clone(&result));
        Ok(result)
    }

    /// Number of live entries in the cache
    #[must_use]
    pub fn cache_len(&self) -> usize {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        self.purge_expired(&mut cache);
        cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn cached(&self, key: &CacheKey) -> Option<Arc<AnalysisResult>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        self.purge_expired(&mut cache);
        cache.get(key).map(|entry| Arc::clone(&entry.result))
    }

    fn store(&self, key: CacheKey, result: Arc<AnalysisResult>) {
        if self.config.max_cache_entries == 0 {
            return;
        }

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        self.purge_expired(&mut cache);

        while cache.len() >= self.config.max_cache_entries {
            let oldest = cache
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    cache.remove(&k);
                }
                None => break,
            }
        }

        cache.insert(
            key,
            CacheEntry {
                result,
                stored_at: Instant::now(),
            },
        );
    }

    fn purge_expired(&self, cache: &mut HashMap<CacheKey, CacheEntry>) {
        let timeout = self.config.cache_timeout;
        cache.retain(|_, entry| entry.stored_at.elapsed() < timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENCE: &str = "ATGCGATCGATCGATCGATCGGGATCGATCGATCGATCGATCAGG";

    fn analyzer(config: AnalysisConfig) -> GuideAnalyzer {
        GuideAnalyzer::new(Arc::new(SystemCatalog::load_embedded().unwrap()), config)
    }

    #[test]
    fn test_analyze_finds_guides() {
        let analyzer = analyzer(AnalysisConfig::default());
        let result = analyzer.analyze(SEQUENCE, "SpCas9", false).unwrap();

        assert!(result.statistics.total_guides > 0);
        assert_eq!(result.guides.len(), result.statistics.total_guides);
        assert_eq!(result.visualization_data.positions.len(), result.guides.len());
        for guide in &result.guides {
            assert_eq!(guide.sequence.len(), 20);
            assert!(guide.pam.ends_with("GG"));
            assert!(guide.off_target_sites.is_none());
        }
    }

    #[test]
    fn test_unknown_system() {
        let analyzer = analyzer(AnalysisConfig::default());
        let err = analyzer.analyze(SEQUENCE, "Cas13", false).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownSystem { ref name, .. } if name == "Cas13"));
        assert!(err.to_string().contains("Cas12a, SpCas9"));
    }

    #[test]
    fn test_length_bounds() {
        let analyzer = analyzer(AnalysisConfig {
            max_sequence_length: 30,
            ..AnalysisConfig::default()
        });

        assert!(matches!(
            analyzer.analyze("ATGC", "SpCas9", false),
            Err(AnalysisError::SequenceTooShort { length: 4, min: 20 })
        ));
        assert!(matches!(
            analyzer.analyze(SEQUENCE, "SpCas9", false),
            Err(AnalysisError::SequenceTooLong { max: 30, .. })
        ));
    }

    #[test]
    fn test_huge_guide_length_yields_no_guides() {
        let mut catalog = SystemCatalog::new();
        catalog
            .add_system(
                "Huge",
                crate::systems::store::CrisprSystem {
                    pam_sequence: "NGG".to_string(),
                    guide_length: usize::MAX,
                    description: "oversized".to_string(),
                },
            )
            .unwrap();
        let analyzer = GuideAnalyzer::new(Arc::new(catalog), AnalysisConfig::default());

        let result = analyzer.analyze(SEQUENCE, "Huge", true).unwrap();
        assert_eq!(result.statistics.total_guides, 0);
        assert!(result.statistics.best_guide.is_none());
    }

    #[test]
    fn test_off_targets_flag() {
        let analyzer = analyzer(AnalysisConfig::default());
        let result = analyzer.analyze(SEQUENCE, "SpCas9", true).unwrap();
        assert!(result.guides.iter().all(|g| g.off_target_sites.is_some()));
    }

    #[test]
    fn test_cache_hit_returns_same_result() {
        let analyzer = analyzer(AnalysisConfig::default());
        let first = analyzer.analyze(SEQUENCE, "SpCas9", false).unwrap();
        let second = analyzer.analyze(SEQUENCE, "SpCas9", false).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(analyzer.cache_len(), 1);

        // Different flag is a different key
        let third = analyzer.analyze(SEQUENCE, "SpCas9", true).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(analyzer.cache_len(), 2);

        analyzer.clear_cache();
        assert_eq!(analyzer.cache_len(), 0);
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let analyzer = analyzer(AnalysisConfig {
            max_cache_entries: 2,
            ..AnalysisConfig::default()
        });
        let first = analyzer.analyze(SEQUENCE, "SpCas9", false).unwrap();
        std::thread::sleep(Duration::from_millis(2));
        analyzer.analyze(SEQUENCE, "SpCas9", true).unwrap();
        std::thread::sleep(Duration::from_millis(2));
        analyzer.analyze(SEQUENCE, "Cas12a", false).unwrap();
        assert_eq!(analyzer.cache_len(), 2);

        let again = analyzer.analyze(SEQUENCE, "SpCas9", false).unwrap();
        assert!(!Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_cache_expires() {
        let analyzer = analyzer(AnalysisConfig {
            cache_timeout: Duration::ZERO,
            ..AnalysisConfig::default()
        });
        analyzer.analyze(SEQUENCE, "SpCas9", false).unwrap();
        assert_eq!(analyzer.cache_len(), 0);
    }

    #[test]
    fn test_cache_disabled() {
        let analyzer = analyzer(AnalysisConfig {
            max_cache_entries: 0,
            ..AnalysisConfig::default()
        });
        let first = analyzer.analyze(SEQUENCE, "SpCas9", false).unwrap();
        let second = analyzer.analyze(SEQUENCE, "SpCas9", false).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }
}
