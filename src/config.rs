//! Deployment configuration.
//!
//! Settings are grouped by deployment environment. The environment comes from
//! `serve --env` or the `CRISPR_GUIDE_ENV` variable and defaults to development.

use std::time::Duration;

use crate::analysis::engine::AnalysisConfig;
use crate::analysis::scoring::ScoringWeights;

/// Environment variable that selects the deployment environment
pub const ENV_VAR: &str = "CRISPR_GUIDE_ENV";

const MIB: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub environment: Environment,
    /// Largest accepted request body or uploaded file, in bytes
    pub max_content_length: usize,
    pub min_sequence_length: usize,
    pub max_sequence_length: usize,
    pub cache_timeout: Duration,
    pub max_cache_entries: usize,
    pub scoring_weights: ScoringWeights,
}

impl AppConfig {
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        let (max_content_length, cache_timeout, max_cache_entries) = match environment {
            Environment::Development => (8 * MIB, Duration::from_secs(300), 256),
            Environment::Production => (16 * MIB, Duration::from_secs(7200), 1024),
            Environment::Testing => (MIB, Duration::from_secs(60), 16),
        };

        Self {
            environment,
            max_content_length,
            min_sequence_length: 20,
            max_sequence_length: 200_000,
            cache_timeout,
            max_cache_entries,
            scoring_weights: ScoringWeights::default(),
        }
    }

    /// Replace the scoring weights
    #[must_use]
    pub fn with_scoring_weights(mut self, weights: ScoringWeights) -> Self {
        self.scoring_weights = weights;
        self
    }

    /// Analyzer settings derived from this configuration
    #[must_use]
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            min_sequence_length: self.min_sequence_length,
            max_sequence_length: self.max_sequence_length,
            scoring_weights: self.scoring_weights,
            cache_timeout: self.cache_timeout,
            max_cache_entries: self.max_cache_entries,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}
