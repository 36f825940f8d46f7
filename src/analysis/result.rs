use serde::{Deserialize, Serialize};

use crate::analysis::guides::Guide;
use crate::core::alphabet::{count_to_f64, round2};

/// Aggregate statistics over every guide found in a sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideStatistics {
    pub total_guides: usize,
    pub average_gc: f64,
    pub average_efficiency: f64,
    /// First guide with the highest efficiency score
    pub best_guide: Option<Guide>,
}

impl GuideStatistics {
    #[must_use]
    pub fn from_guides(guides: &[Guide]) -> Self {
        if guides.is_empty() {
            return Self {
                total_guides: 0,
                average_gc: 0.0,
                average_efficiency: 0.0,
                best_guide: None,
            };
        }

        let n = count_to_f64(guides.len());
        let gc_sum: f64 = guides.iter().map(|g| g.gc_content).sum();
        let efficiency_sum: f64 = guides.iter().map(|g| g.efficiency_score).sum();

        // Ties keep the earlier guide
        let best = guides.iter().fold(None::<&Guide>, |best, guide| match best {
            Some(b) if b.efficiency_score >= guide.efficiency_score => Some(b),
            _ => Some(guide),
        });

        Self {
            total_guides: guides.len(),
            average_gc: round2(gc_sum / n),
            average_efficiency: round2(efficiency_sum / n),
            best_guide: best.cloned(),
        }
    }
}

/// Per-guide series for plotting, aligned by index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationData {
    pub positions: Vec<usize>,
    pub scores: Vec<f64>,
    pub gc_contents: Vec<f64>,
}

impl VisualizationData {
    #[must_use]
    pub fn from_guides(guides: &[Guide]) -> Self {
        Self {
            positions: guides.iter().map(|g| g.position).collect(),
            scores: guides.iter().map(|g| g.efficiency_score).collect(),
            gc_contents: guides.iter().map(|g| g.gc_content).collect(),
        }
    }
}

/// Everything produced by one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub statistics: GuideStatistics,
    pub guides: Vec<Guide>,
    pub visualization_data: VisualizationData,
}

impl AnalysisResult {
    #[must_use]
    pub fn from_guides(guides: Vec<Guide>) -> Self {
        Self {
            statistics: GuideStatistics::from_guides(&guides),
            visualization_data: VisualizationData::from_guides(&guides),
            guides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide(position: usize, gc: f64, efficiency: f64) -> Guide {
        Guide {
            sequence: "A".repeat(20),
            position,
            pam: "AGG".to_string(),
            gc_content: gc,
            structure_score: 0.0,
            efficiency_score: efficiency,
            off_target_sites: None,
            off_target_score: None,
        }
    }

    #[test]
    fn test_statistics_empty() {
        let stats = GuideStatistics::from_guides(&[]);
        assert_eq!(stats.total_guides, 0);
        assert!(stats.average_gc.abs() < 1e-9);
        assert!(stats.average_efficiency.abs() < 1e-9);
        assert!(stats.best_guide.is_none());
    }

    #[test]
    fn test_statistics_averages() {
        let guides = vec![guide(0, 40.0, 70.0), guide(5, 60.0, 80.0), guide(9, 55.0, 75.0)];
        let stats = GuideStatistics::from_guides(&guides);
        assert_eq!(stats.total_guides, 3);
        assert!((stats.average_gc - 51.67).abs() < 1e-9);
        assert!((stats.average_efficiency - 75.0).abs() < 1e-9);
        assert_eq!(stats.best_guide.unwrap().position, 5);
    }

    #[test]
    fn test_best_guide_first_on_tie() {
        let guides = vec![guide(3, 50.0, 90.0), guide(7, 50.0, 90.0)];
        let stats = GuideStatistics::from_guides(&guides);
        assert_eq!(stats.best_guide.unwrap().position, 3);
    }

    #[test]
    fn test_visualization_aligned() {
        let result = AnalysisResult::from_guides(vec![guide(2, 45.0, 60.0), guide(8, 65.0, 85.0)]);
        let viz = &result.visualization_data;
        assert_eq!(viz.positions, vec![2, 8]);
        assert_eq!(viz.scores, vec![60.0, 85.0]);
        assert_eq!(viz.gc_contents, vec![45.0, 65.0]);
    }

    #[test]
    fn test_serialized_shape() {
        let result = AnalysisResult::from_guides(vec![]);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["statistics"]["best_guide"].is_null());
        assert_eq!(json["guides"], serde_json::json!([]));
        assert_eq!(json["visualization_data"]["positions"], serde_json::json!([]));
    }
}
