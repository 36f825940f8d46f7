//! Guide discovery: scan a sequence for protospacers followed by a PAM.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::scoring::{
    efficiency_score, off_target_summary, structure_score, ScoringWeights,
};
use crate::core::alphabet::{gc_percent, reverse_complement};
use crate::systems::pam::PamPattern;

/// Off-target scanning is quadratic in sequence length; longer inputs skip it
pub const MAX_OFF_TARGET_SEQUENCE_LENGTH: usize = 10_000;

/// A candidate guide RNA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    /// Protospacer bases (the guide RNA target)
    pub sequence: String,

    /// 0-based start of the protospacer in the analysed sequence
    pub position: usize,

    /// The bases that satisfied the PAM pattern
    pub pam: String,

    /// GC percentage of the protospacer
    pub gc_content: f64,

    /// Secondary-structure potential (0-100)
    pub structure_score: f64,

    /// Weighted efficiency (0-100)
    pub efficiency_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_target_sites: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_target_score: Option<f64>,
}

/// Find every protospacer of `guide_length` bases immediately followed by the PAM.
///
/// `sequence` must be upper-case. Every start position whose guide and PAM
/// both fit in the sequence is considered.
#[must_use]
pub fn find_guides(
    sequence: &str,
    pam: &PamPattern,
    guide_length: usize,
    weights: &ScoringWeights,
) -> Vec<Guide> {
    let bases = sequence.as_bytes();
    let Some(window) = guide_length.checked_add(pam.len()) else {
        return Vec::new();
    };
    if guide_length == 0 || bases.len() < window {
        return Vec::new();
    }

    (0..=bases.len() - window)
        .filter_map(|i| {
            let pam_site = &bases[i + guide_length..i + window];
            if !pam.matches(pam_site) {
                return None;
            }

            let protospacer = String::from_utf8_lossy(&bases[i..i + guide_length]).into_owned();
            let gc_content = gc_percent(&protospacer);
            let structure = structure_score(&protospacer);

            Some(Guide {
                position: i,
                pam: String::from_utf8_lossy(pam_site).into_owned(),
                gc_content,
                structure_score: structure,
                efficiency_score: efficiency_score(gc_content, structure, None, weights),
                sequence: protospacer,
                off_target_sites: None,
                off_target_score: None,
            })
        })
        .collect()
}

/// Fill in off-target counts for each guide and rescore it with the
/// off-target weight.
///
/// Returns `false` without touching the guides when the sequence is longer
/// than `MAX_OFF_TARGET_SEQUENCE_LENGTH`.
pub fn annotate_off_targets(guides: &mut [Guide], sequence: &str, weights: &ScoringWeights) -> bool {
    if sequence.len() > MAX_OFF_TARGET_SEQUENCE_LENGTH {
        warn!(
            length = sequence.len(),
            limit = MAX_OFF_TARGET_SEQUENCE_LENGTH,
            "Skipping off-target scan for long sequence"
        );
        return false;
    }

    let reverse = reverse_complement(sequence);
    for guide in guides.iter_mut() {
        let summary = off_target_summary(
            guide.sequence.as_bytes(),
            guide.position,
            sequence.as_bytes(),
            reverse.as_bytes(),
        );
        guide.off_target_sites = Some(summary.sites);
        guide.off_target_score = Some(summary.score);
        guide.efficiency_score = efficiency_score(
            guide.gc_content,
            guide.structure_score,
            Some(summary.score),
            weights,
        );
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ngg() -> PamPattern {
        PamPattern::parse("NGG").unwrap()
    }

    #[test]
    fn test_find_single_guide() {
        // 20-base protospacer followed by TGG
        let protospacer = "ACGTACGTACGTACGTACGT";
        let sequence = format!("{protospacer}TGG");

        let guides = find_guides(&sequence, &ngg(), 20, &ScoringWeights::default());
        assert_eq!(guides.len(), 1);

        let guide = &guides[0];
        assert_eq!(guide.sequence, protospacer);
        assert_eq!(guide.position, 0);
        assert_eq!(guide.pam, "TGG");
        assert!((guide.gc_content - 50.0).abs() < 1e-9);
        // ACGT repeats are fully self-complementary
        assert!((guide.structure_score - 100.0).abs() < 1e-9);
        // 100 * 0.6 + 100 * 0.4
        assert!((guide.efficiency_score - 100.0).abs() < 1e-9);
        assert_eq!(guide.off_target_sites, None);
    }

    #[test]
    fn test_pam_at_very_end_is_found() {
        let sequence = format!("{}AGG", "A".repeat(20));
        let guides = find_guides(&sequence, &ngg(), 20, &ScoringWeights::default());
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].position, 0);
    }

    #[test]
    fn test_multiple_guides_in_order() {
        let sequence = format!("{}CGGGG", "T".repeat(21));
        let guides = find_guides(&sequence, &ngg(), 20, &ScoringWeights::default());
        let positions: Vec<usize> = guides.iter().map(|g| g.position).collect();
        // TCG at 20 is not NGG; CGG at 21, GGG at 22 and 23 are
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(guides[0].pam, "CGG");
        assert_eq!(guides[1].pam, "GGG");
        assert_eq!(guides[2].pam, "GGG");
    }

    #[test]
    fn test_short_sequence_has_no_guides() {
        let guides = find_guides("ACGTGG", &ngg(), 20, &ScoringWeights::default());
        assert!(guides.is_empty());
        assert!(find_guides("", &ngg(), 20, &ScoringWeights::default()).is_empty());
    }

    #[test]
    fn test_oversized_guide_length_finds_nothing() {
        let sequence = format!("{}AGG", "A".repeat(20));
        let weights = ScoringWeights::default();
        assert!(find_guides(&sequence, &ngg(), usize::MAX, &weights).is_empty());
        assert!(find_guides(&sequence, &ngg(), usize::MAX - 2, &weights).is_empty());
    }

    #[test]
    fn test_n_bases_do_not_satisfy_pam() {
        let sequence = format!("{}NGG", "A".repeat(20));
        // The N sits in the PAM's N position, which requires a concrete base
        assert!(find_guides(&sequence, &ngg(), 20, &ScoringWeights::default()).is_empty());
    }

    #[test]
    fn test_cas12a_layout() {
        let pam = PamPattern::parse("TTTV").unwrap();
        let sequence = format!("{}TTTA", "G".repeat(23));
        let guides = find_guides(&sequence, &pam, 23, &ScoringWeights::default());
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].pam, "TTTA");
        assert_eq!(guides[0].sequence.len(), 23);
    }

    #[test]
    fn test_annotate_off_targets() {
        let sequence = format!("{}TGG", "ACGTACGTACGTACGTACGT");
        let mut guides = find_guides(&sequence, &ngg(), 20, &ScoringWeights::default());
        let before = guides[0].efficiency_score;
        assert!(annotate_off_targets(&mut guides, &sequence, &ScoringWeights::default()));
        assert!(guides[0].off_target_sites.is_some());
        assert!(guides[0].off_target_score.is_some());
        // Zero off-target weight keeps the score
        assert!((guides[0].efficiency_score - before).abs() < 1e-9);
    }

    #[test]
    fn test_off_target_weight_lowers_repetitive_guide() {
        // The guide's own repeat unit shows up again downstream as near matches
        let sequence = format!("{}TGG{}", "ACGTACGTACGTACGTACGT", "ACGTACGTACGTACGTACGA".repeat(2));
        let weights = ScoringWeights {
            gc: 0.3,
            structure: 0.3,
            off_target: 0.4,
        };
        let mut guides = find_guides(&sequence, &ngg(), 20, &weights);
        let guide = guides.iter().position(|g| g.position == 0).unwrap();
        assert!(annotate_off_targets(&mut guides, &sequence, &weights));
        let annotated = &guides[guide];
        let load = annotated.off_target_score.unwrap();
        assert!(load > 0.0);
        let expected = efficiency_score(
            annotated.gc_content,
            annotated.structure_score,
            Some(load),
            &weights,
        );
        assert!((annotated.efficiency_score - expected).abs() < 1e-9);

        let unique = efficiency_score(
            annotated.gc_content,
            annotated.structure_score,
            Some(0.0),
            &weights,
        );
        assert!(annotated.efficiency_score < unique);
    }

    #[test]
    fn test_annotate_off_targets_skips_long_sequences() {
        let sequence = "A".repeat(MAX_OFF_TARGET_SEQUENCE_LENGTH + 1);
        let mut guides = vec![];
        assert!(!annotate_off_targets(&mut guides, &sequence, &ScoringWeights::default()));
    }
}
