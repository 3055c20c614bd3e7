use crate::detection::config::DetectionConfig;
use crate::models::{CandidateSegment, FinalSegment};

/// Fold time-sorted candidates into non-overlapping segments.
///
/// A candidate joins the previous segment when it starts within
/// `merge_gap_secs` of that segment's end. Merging keeps the later end,
/// the best score and type count, the union of keywords, and the higher
/// confidence.
pub fn merge_segments(
    mut candidates: Vec<CandidateSegment>,
    config: &DetectionConfig,
) -> Vec<FinalSegment> {
    candidates.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<FinalSegment> = Vec::new();

    for candidate in candidates {
        match merged.last_mut() {
            Some(last) if candidate.start <= last.end + config.merge_gap_secs => {
                absorb(last, candidate);
            }
            _ => merged.push(candidate),
        }
    }

    merged
}

fn absorb(target: &mut FinalSegment, other: CandidateSegment) {
    target.end = target.end.max(other.end);
    target.score = target.score.max(other.score);
    target.signal_type_count = target.signal_type_count.max(other.signal_type_count);
    target.confidence = target.confidence.max(other.confidence);
    target.keywords.extend(other.keywords);
}

/// Presentation order for the result consumer: highest score first.
/// Ties keep their time order.
pub fn rank_segments(segments: &[FinalSegment]) -> Vec<FinalSegment> {
    let mut ranked = segments.to_vec();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;

    fn seg(
        start: f64,
        end: f64,
        score: u32,
        confidence: Confidence,
        keywords: &[&str],
    ) -> CandidateSegment {
        CandidateSegment {
            start,
            end,
            score,
            signal_type_count: 2,
            confidence,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_adjacent_segments_merge() {
        let merged = merge_segments(
            vec![
                seg(45.0, 70.0, 20, Confidence::Medium, &["use code"]),
                seg(10.0, 40.0, 35, Confidence::Low, &["nordvpn"]),
            ],
            &DetectionConfig::default(),
        );
        assert_eq!(merged.len(), 1);
        let only = &merged[0];
        assert_eq!((only.start, only.end), (10.0, 70.0));
        assert_eq!(only.score, 35);
        assert_eq!(only.confidence, Confidence::Medium);
        assert!(only.keywords.contains("nordvpn") && only.keywords.contains("use code"));
    }

    #[test]
    fn test_distant_segments_stay_separate() {
        let merged = merge_segments(
            vec![
                seg(10.0, 40.0, 20, Confidence::Low, &[]),
                seg(65.0, 90.0, 20, Confidence::Low, &[]),
            ],
            &DetectionConfig::default(),
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].start, 65.0);
    }

    #[test]
    fn test_confidence_never_downgrades() {
        let merged = merge_segments(
            vec![
                seg(10.0, 60.0, 40, Confidence::High, &[]),
                seg(20.0, 50.0, 22, Confidence::Low, &[]),
            ],
            &DetectionConfig::default(),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, Confidence::High);
        assert_eq!(merged[0].end, 60.0);
    }

    #[test]
    fn test_chain_merges_into_one() {
        let merged = merge_segments(
            vec![
                seg(0.0, 40.0, 20, Confidence::Low, &[]),
                seg(55.0, 100.0, 20, Confidence::Low, &[]),
                seg(115.0, 150.0, 20, Confidence::Low, &[]),
            ],
            &DetectionConfig::default(),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].end, 150.0);
    }

    #[test]
    fn test_rank_segments_by_score() {
        let ranked = rank_segments(&[
            seg(10.0, 40.0, 20, Confidence::Low, &[]),
            seg(300.0, 360.0, 45, Confidence::High, &[]),
            seg(500.0, 560.0, 20, Confidence::Low, &[]),
        ]);
        let starts: Vec<f64> = ranked.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![300.0, 10.0, 500.0]);
    }
}
