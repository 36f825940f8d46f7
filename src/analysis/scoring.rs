//! Guide scoring: GC balance, secondary-structure potential and off-target load.
//!
//! Off-target load only enters the efficiency score when the off-target weight
//! is non-zero and off-targets were scanned for the guide.

use crate::core::alphabet::{complement, count_to_f64, round2};

/// Guides whose off-target windows differ by at most this many bases are counted
pub const MAX_OFF_TARGET_MISMATCHES: usize = 3;

/// Off-target score at which the specificity component bottoms out at zero
pub const MAX_OFF_TARGET_SCORE: f64 = 4.0;

/// Configurable weights for the efficiency score components
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoringWeights {
    /// Weight for GC balance (closeness to 50% GC)
    pub gc: f64,
    /// Weight for secondary-structure score
    pub structure: f64,
    /// Weight for off-target specificity; ignored when off-targets were not scanned
    #[serde(default)]
    pub off_target: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            gc: 0.6,         // 60%
            structure: 0.4,  // 40%
            off_target: 0.0, // opt-in
        }
    }
}

impl ScoringWeights {
    /// Normalize weights to sum to 1.0
    #[must_use]
    pub fn normalized(&self) -> Self {
        let total = self.gc + self.structure + self.off_target;

        if total <= 0.0 {
            return Self::default();
        }

        Self {
            gc: self.gc / total,
            structure: self.structure / total,
            off_target: self.off_target / total,
        }
    }

    /// The same weights with the off-target component removed
    #[must_use]
    pub fn without_off_target(&self) -> Self {
        Self {
            off_target: 0.0,
            ..*self
        }
    }
}

/// GC balance score in 0-100: 100 at 50% GC, falling linearly to 50 at 0% or 100%
#[must_use]
pub fn gc_score(gc_content: f64) -> f64 {
    100.0 - (gc_content - 50.0).abs().min(50.0)
}

/// Fraction of positions where a sequence equals its own reverse complement
#[must_use]
pub fn self_complementarity(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }

    let matches = sequence
        .chars()
        .zip(sequence.chars().rev().map(complement))
        .filter(|(base, rc)| base.eq_ignore_ascii_case(rc))
        .count();

    count_to_f64(matches) / count_to_f64(sequence.len())
}

/// Secondary-structure potential in 0-100, two decimals
#[must_use]
pub fn structure_score(sequence: &str) -> f64 {
    round2(self_complementarity(sequence) * 100.0)
}

/// Specificity in 0-100: 100 with no off-target load, 0 at `MAX_OFF_TARGET_SCORE` or above
#[must_use]
pub fn off_target_specificity(off_target_score: f64) -> f64 {
    100.0 * (1.0 - (off_target_score / MAX_OFF_TARGET_SCORE).clamp(0.0, 1.0))
}

/// Weighted efficiency score in 0-100, two decimals.
///
/// `off_target_score` is `None` when off-targets were not scanned; the
/// remaining weights are then renormalized without the off-target component.
#[must_use]
pub fn efficiency_score(
    gc_content: f64,
    structure_score: f64,
    off_target_score: Option<f64>,
    weights: &ScoringWeights,
) -> f64 {
    let w = match off_target_score {
        Some(_) => weights.normalized(),
        None => weights.without_off_target().normalized(),
    };
    let specificity = off_target_score.map_or(0.0, off_target_specificity);

    round2(gc_score(gc_content) * w.gc + structure_score * w.structure + specificity * w.off_target)
}

/// Count mismatching positions between two equal-length windows
#[must_use]
pub fn count_mismatches(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Potential off-target sites for one guide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffTargetSummary {
    /// Number of windows (both strands) within `MAX_OFF_TARGET_MISMATCHES`
    pub sites: usize,
    /// Sum of `mismatches / guide_length` over those windows
    pub score: f64,
}

/// Scan both strands for windows similar to the guide.
///
/// The guide's own forward-strand site is excluded, as is any reverse-strand
/// window identical to the guide.
#[must_use]
pub fn off_target_summary(
    guide: &[u8],
    position: usize,
    forward: &[u8],
    reverse: &[u8],
) -> OffTargetSummary {
    let mut summary = OffTargetSummary {
        sites: 0,
        score: 0.0,
    };
    if guide.is_empty() {
        return summary;
    }

    let mut record = |mismatches: usize| {
        summary.sites += 1;
        summary.score += count_to_f64(mismatches) / count_to_f64(guide.len());
    };

    for (i, site) in forward.windows(guide.len()).enumerate() {
        if i == position {
            continue;
        }
        let mismatches = count_mismatches(guide, site);
        if mismatches <= MAX_OFF_TARGET_MISMATCHES {
            record(mismatches);
        }
    }

    for site in reverse.windows(guide.len()) {
        let mismatches = count_mismatches(guide, site);
        if mismatches > 0 && mismatches <= MAX_OFF_TARGET_MISMATCHES {
            record(mismatches);
        }
    }

    summary.score = round2(summary.score);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gc_score() {
        assert!((gc_score(50.0) - 100.0).abs() < 1e-9);
        assert!((gc_score(40.0) - 90.0).abs() < 1e-9);
        assert!((gc_score(0.0) - 50.0).abs() < 1e-9);
        assert!((gc_score(100.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_complementarity() {
        // ACGT is its own reverse complement
        assert!((self_complementarity("ACGT") - 1.0).abs() < 1e-9);
        // AAAA vs TTTT: no position matches
        assert!(self_complementarity("AAAA").abs() < 1e-9);
        // AACC vs GGTT: none match
        assert!(self_complementarity("AACC").abs() < 1e-9);
        assert!(self_complementarity("").abs() < 1e-9);
    }

    #[test]
    fn test_structure_score() {
        assert!((structure_score("ACGT") - 100.0).abs() < 1e-9);
        // ACGA vs TCGT: positions 1 and 2 match
        assert!((structure_score("ACGA") - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_score() {
        let weights = ScoringWeights::default();
        // 100 * 0.6 + 50 * 0.4 = 80
        assert!((efficiency_score(50.0, 50.0, None, &weights) - 80.0).abs() < 1e-9);
        // 50 * 0.6 + 0 * 0.4 = 30
        assert!((efficiency_score(0.0, 0.0, None, &weights) - 30.0).abs() < 1e-9);
        // Zero off-target weight leaves the score unchanged
        assert!((efficiency_score(50.0, 50.0, Some(4.0), &weights) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_off_target_specificity() {
        assert!((off_target_specificity(0.0) - 100.0).abs() < 1e-9);
        assert!((off_target_specificity(1.0) - 75.0).abs() < 1e-9);
        assert!(off_target_specificity(4.0).abs() < 1e-9);
        assert!(off_target_specificity(9.5).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_score_with_off_target_weight() {
        let weights = ScoringWeights {
            gc: 0.3,
            structure: 0.3,
            off_target: 0.4,
        };
        // 100 * 0.3 + 50 * 0.3 + 75 * 0.4 = 75
        assert!((efficiency_score(50.0, 50.0, Some(1.0), &weights) - 75.0).abs() < 1e-9);
        // Heavy off-target load: 100 * 0.3 + 50 * 0.3 + 0 * 0.4 = 45
        assert!((efficiency_score(50.0, 50.0, Some(6.0), &weights) - 45.0).abs() < 1e-9);
        // Not scanned: renormalize over GC and structure, 100 * 0.5 + 50 * 0.5 = 75
        assert!((efficiency_score(50.0, 50.0, None, &weights) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_weights_normalized() {
        let weights = ScoringWeights {
            gc: 60.0,
            structure: 40.0,
            off_target: 0.0,
        };
        let norm = weights.normalized();
        assert!((norm.gc - 0.6).abs() < 1e-9);
        assert!((norm.structure - 0.4).abs() < 1e-9);
        assert!(norm.off_target.abs() < 1e-9);

        let zero = ScoringWeights {
            gc: 0.0,
            structure: 0.0,
            off_target: 0.0,
        };
        assert_eq!(zero.normalized(), ScoringWeights::default());
    }

    #[test]
    fn test_count_mismatches() {
        assert_eq!(count_mismatches(b"ATGC", b"ATGC"), 0);
        assert_eq!(count_mismatches(b"ATGC", b"TTGA"), 2);
    }

    #[test]
    fn test_off_target_forward_strand() {
        let forward = b"AAAAAAAACCCCCCCCAAAAAAAT";
        let summary = off_target_summary(b"AAAAAAAA", 0, forward, b"");
        // Windows 1-3 and 13-16 are within 3 mismatches (1+2+3+3+2+1+1 = 13)
        assert_eq!(summary.sites, 7);
        assert!((summary.score - 1.625).abs() < 0.006);
    }

    #[test]
    fn test_off_target_reverse_strand_skips_identical() {
        let summary = off_target_summary(b"AAAAAAAA", 0, b"", b"AAAAAAAAT");
        // The identical window is skipped; "AAAAAAAT" has one mismatch
        assert_eq!(summary.sites, 1);
    }

    #[test]
    fn test_off_target_excludes_own_site() {
        let forward = b"GATTACAGG";
        let own_excluded = off_target_summary(b"GATTACA", 0, forward, b"");
        let own_included = off_target_summary(b"GATTACA", usize::MAX, forward, b"");
        assert_eq!(own_excluded.sites, 0);
        assert_eq!(own_included.sites, 1);
    }
}
