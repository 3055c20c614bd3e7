use std::collections::BTreeSet;

use crate::detection::config::DetectionConfig;
use crate::detection::scoring::{
    classify_confidence, has_corroboration, minimum_score, score_window, WindowScore,
};
use crate::models::{CandidateSegment, CurveAnalysis, SignalCategory, SignalMatch};
use crate::log_debug;
use crate::utils::format_time;

const ENABLE_LOGS: bool = true;

/// Why a window did not produce a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRejection {
    TooFewMatches,
    ScoreBelowMinimum,
    TooFewSignalTypes,
    NoStrongSignal,
    NoCorroboration,
    DurationOutOfRange,
}

/// Slide a fixed window over the match timeline and turn every window
/// that passes the gates into a candidate.
///
/// `curve` is `None` when the engagement curve was unavailable, which is
/// stricter than a curve that merely has no valleys.
pub fn detect_candidates(
    matches: &[SignalMatch],
    curve: Option<&CurveAnalysis>,
    duration: f64,
    config: &DetectionConfig,
) -> Vec<CandidateSegment> {
    if matches.is_empty() {
        log_debug!("No signal matches, skipping window scan");
        return Vec::new();
    }

    if !duration.is_finite() || duration <= 0.0 || config.step_secs <= 0.0 {
        log_debug!("Unusable video duration {}, skipping window scan", duration);
        return Vec::new();
    }

    let mut sorted: Vec<&SignalMatch> = matches.iter().collect();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));

    let Some((first_step, last_step)) = step_range(&sorted, duration, config) else {
        return Vec::new();
    };
    let mut candidates = Vec::new();

    for step in first_step..=last_step {
        let window_start = step as f64 * config.step_secs;
        let window_end = window_start + config.window_secs;
        let in_window: Vec<&SignalMatch> = sorted
            .iter()
            .copied()
            .filter(|m| m.time >= window_start && m.time < window_end)
            .collect();

        match evaluate_window(&in_window, curve, config) {
            Ok(candidate) => {
                log_debug!(
                    "Window {} accepted: {}-{} score={} types={} [{}]",
                    format_time(window_start),
                    format_time(candidate.start),
                    format_time(candidate.end),
                    candidate.score,
                    candidate.signal_type_count,
                    candidate.confidence.as_str()
                );
                candidates.push(candidate);
            }
            Err(WindowRejection::TooFewMatches) => {}
            Err(reason) => {
                log_debug!("Window {} rejected: {:?}", format_time(window_start), reason);
            }
        }
    }

    candidates
}

/// Inclusive range of window indices that can hold a match.
///
/// Windows after the last match or ending before the first one are empty,
/// so the range stays bounded by the match span rather than the duration.
fn step_range(
    sorted: &[&SignalMatch],
    duration: f64,
    config: &DetectionConfig,
) -> Option<(u64, u64)> {
    let first_time = sorted.first()?.time;
    let last_time = sorted.last()?.time;

    let scan_end = (duration - config.scan_tail_secs).min(last_time);
    if scan_end.is_nan() || scan_end < 0.0 {
        return None;
    }

    let first_step = ((first_time - config.window_secs) / config.step_secs)
        .floor()
        .max(0.0) as u64;
    let last_step = (scan_end / config.step_secs).floor() as u64;
    (first_step <= last_step).then_some((first_step, last_step))
}

/// Run the gates, boundary computation and grading for one window.
pub fn evaluate_window(
    in_window: &[&SignalMatch],
    curve: Option<&CurveAnalysis>,
    config: &DetectionConfig,
) -> Result<CandidateSegment, WindowRejection> {
    if in_window.len() < config.min_matches {
        return Err(WindowRejection::TooFewMatches);
    }

    let window = score_window(in_window);

    if window.score < minimum_score(curve, config) {
        return Err(WindowRejection::ScoreBelowMinimum);
    }
    if window.signal_type_count() < config.min_signal_types {
        return Err(WindowRejection::TooFewSignalTypes);
    }
    if window.strong_count == 0 {
        return Err(WindowRejection::NoStrongSignal);
    }
    if curve.is_none() && !has_corroboration(&window) {
        return Err(WindowRejection::NoCorroboration);
    }

    let (mut start, mut end) = window_bounds(in_window, config);

    if let Some(analysis) = curve {
        if let Some(valley) = analysis.valleys.iter().find(|v| v.overlaps(start, end)) {
            start = start.min(valley.start);
            end = end.max(valley.end);
        }
    }

    let candidate = build_candidate(in_window, &window, start, end, config);
    let length = candidate.duration_secs();
    if length < config.min_segment_secs || length > config.max_segment_secs {
        return Err(WindowRejection::DurationOutOfRange);
    }

    Ok(candidate)
}

/// Initial segment bounds before curve refinement.
fn window_bounds(in_window: &[&SignalMatch], config: &DetectionConfig) -> (f64, f64) {
    let first = in_window
        .iter()
        .map(|m| m.time)
        .fold(f64::INFINITY, f64::min);
    let last = in_window
        .iter()
        .map(|m| m.time)
        .fold(f64::NEG_INFINITY, f64::max);

    let end = last + config.cta_padding_secs;
    let start = match in_window
        .iter()
        .find(|m| m.category == SignalCategory::Start)
    {
        Some(anchor) => anchor.time,
        None => (first - config.lead_in_secs).max(0.0),
    };

    (start, end)
}

fn build_candidate(
    in_window: &[&SignalMatch],
    window: &WindowScore,
    start: f64,
    end: f64,
    config: &DetectionConfig,
) -> CandidateSegment {
    let keywords: BTreeSet<String> = in_window.iter().map(|m| m.phrase.clone()).collect();
    let signal_type_count = window.signal_type_count();

    CandidateSegment {
        start,
        end,
        score: window.score,
        signal_type_count,
        confidence: classify_confidence(window.score, signal_type_count, config),
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, CurveValley};

    fn m(time: f64, category: SignalCategory, phrase: &str) -> SignalMatch {
        SignalMatch::new(time, category, phrase)
    }

    fn curve_with(valleys: Vec<CurveValley>) -> CurveAnalysis {
        CurveAnalysis {
            points: Vec::new(),
            slopes: Vec::new(),
            valleys,
            max_slope: 0.0,
            max_slope_time: 0.0,
        }
    }

    fn evaluate(
        matches: &[SignalMatch],
        curve: Option<&CurveAnalysis>,
    ) -> Result<CandidateSegment, WindowRejection> {
        let refs: Vec<&SignalMatch> = matches.iter().collect();
        evaluate_window(&refs, curve, &DetectionConfig::default())
    }

    #[test]
    fn test_brand_and_end_below_minimum_without_curve() {
        let matches = vec![
            m(100.0, SignalCategory::Brand, "nordvpn"),
            m(120.0, SignalCategory::End, "use code"),
        ];
        let config = DetectionConfig::default();
        assert!(detect_candidates(&matches, None, 600.0, &config).is_empty());

        // Even with the match-count gate relaxed, 20 does not reach 25.
        let relaxed = DetectionConfig {
            min_matches: 2,
            ..DetectionConfig::default()
        };
        let refs: Vec<&SignalMatch> = matches.iter().collect();
        assert_eq!(
            evaluate_window(&refs, None, &relaxed),
            Err(WindowRejection::ScoreBelowMinimum)
        );
    }

    #[test]
    fn test_second_brand_reaches_minimum_with_medium_confidence() {
        let matches = vec![
            m(100.0, SignalCategory::Brand, "nordvpn"),
            m(110.0, SignalCategory::Brand, "nordvpn"),
            m(120.0, SignalCategory::End, "use code"),
        ];
        let candidate = evaluate(&matches, None).unwrap();
        assert_eq!(candidate.score, 32);
        assert_eq!(candidate.signal_type_count, 2);
        assert_eq!(candidate.confidence, Confidence::Medium);
        // No start phrase: lead-in back-off before the first match.
        assert_eq!(candidate.start, 90.0);
        assert_eq!(candidate.end, 135.0);
    }

    #[test]
    fn test_start_phrase_anchors_segment_start() {
        let matches = vec![
            m(100.0, SignalCategory::Weak, "check out"),
            m(105.0, SignalCategory::Start, "sponsored by"),
            m(110.0, SignalCategory::Brand, "squarespace"),
            m(130.0, SignalCategory::End, "use code"),
        ];
        let candidate = evaluate(&matches, None).unwrap();
        assert_eq!(candidate.start, 105.0);
        assert_eq!(candidate.end, 145.0);
        assert_eq!(candidate.confidence, Confidence::High);
        assert_eq!(candidate.keywords.len(), 4);
    }

    #[test]
    fn test_diversity_and_strong_signal_gates() {
        let single_type = vec![
            m(100.0, SignalCategory::Brand, "nordvpn"),
            m(110.0, SignalCategory::Brand, "surfshark"),
            m(120.0, SignalCategory::Brand, "incogni"),
        ];
        assert_eq!(
            evaluate(&single_type, None),
            Err(WindowRejection::TooFewSignalTypes)
        );

        let weak_only: Vec<SignalMatch> = (0..6)
            .flat_map(|i| {
                let t = 100.0 + f64::from(i) * 5.0;
                vec![
                    m(t, SignalCategory::Topic, "privacy"),
                    m(t, SignalCategory::Weak, "visit"),
                ]
            })
            .collect();
        let valleys = curve_with(vec![CurveValley { start: 90.0, end: 130.0 }]);
        assert_eq!(
            evaluate(&weak_only, Some(&valleys)),
            Err(WindowRejection::NoStrongSignal)
        );
    }

    #[test]
    fn test_corroboration_only_required_without_curve() {
        let matches = vec![
            m(100.0, SignalCategory::Brand, "nordvpn"),
            m(110.0, SignalCategory::Brand, "nordvpn"),
            m(120.0, SignalCategory::Topic, "privacy"),
        ];
        assert_eq!(evaluate(&matches, None), Err(WindowRejection::NoCorroboration));

        let flat_curve = curve_with(Vec::new());
        let candidate = evaluate(&matches, Some(&flat_curve)).unwrap();
        assert_eq!(candidate.score, 27);
    }

    #[test]
    fn test_valley_widens_bounds_and_lowers_minimum() {
        let matches = vec![
            m(100.0, SignalCategory::Start, "sponsored by"),
            m(105.0, SignalCategory::Topic, "vpn"),
            m(110.0, SignalCategory::Weak, "visit"),
        ];
        // score 15 passes only because a valley exists
        assert_eq!(
            evaluate(&matches, Some(&curve_with(Vec::new()))),
            Err(WindowRejection::ScoreBelowMinimum)
        );

        let curve = curve_with(vec![
            CurveValley { start: 95.0, end: 150.0 },
            CurveValley { start: 118.0, end: 200.0 },
        ]);
        let candidate = evaluate(&matches, Some(&curve)).unwrap();
        assert_eq!(candidate.start, 95.0);
        // first overlapping valley only
        assert_eq!(candidate.end, 150.0);
        assert_eq!(candidate.confidence, Confidence::Low);
    }

    #[test]
    fn test_duration_gate() {
        // 100 + 15 padding - 100 = 15s, too short
        let short = vec![
            m(100.0, SignalCategory::Start, "sponsored by"),
            m(100.0, SignalCategory::Brand, "nordvpn"),
            m(100.0, SignalCategory::End, "use code"),
        ];
        assert_eq!(evaluate(&short, None), Err(WindowRejection::DurationOutOfRange));

        let curve = curve_with(vec![CurveValley { start: 20.0, end: 400.0 }]);
        let long = vec![
            m(100.0, SignalCategory::Start, "sponsored by"),
            m(120.0, SignalCategory::Brand, "nordvpn"),
            m(130.0, SignalCategory::End, "use code"),
        ];
        assert_eq!(
            evaluate(&long, Some(&curve)),
            Err(WindowRejection::DurationOutOfRange)
        );
    }

    #[test]
    fn test_overlapping_windows_each_emit_candidates() {
        let matches = vec![
            m(100.0, SignalCategory::Start, "sponsored by"),
            m(110.0, SignalCategory::Brand, "nordvpn"),
            m(130.0, SignalCategory::End, "use code"),
        ];
        let candidates = detect_candidates(&matches, None, 600.0, &DetectionConfig::default());
        // window starts 45, 60, 75, 90 all contain the three matches
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|c| c.start == 100.0 && c.end == 145.0));
    }

    #[test]
    fn test_short_video_has_no_windows() {
        let matches = vec![
            m(1.0, SignalCategory::Start, "sponsored by"),
            m(2.0, SignalCategory::Brand, "nordvpn"),
            m(3.0, SignalCategory::End, "use code"),
        ];
        assert!(detect_candidates(&matches, None, 20.0, &DetectionConfig::default()).is_empty());
    }

    fn sponsor_read() -> Vec<SignalMatch> {
        vec![
            m(100.0, SignalCategory::Start, "sponsored by"),
            m(110.0, SignalCategory::Brand, "nordvpn"),
            m(130.0, SignalCategory::End, "use code"),
        ]
    }

    #[test]
    fn test_non_finite_duration_yields_nothing() {
        let config = DetectionConfig::default();
        for duration in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY, 0.0, -5.0] {
            assert!(
                detect_candidates(&sponsor_read(), None, duration, &config).is_empty(),
                "duration {duration}"
            );
        }
    }

    #[test]
    fn test_huge_duration_scans_only_around_matches() {
        let candidates =
            detect_candidates(&sponsor_read(), None, 1.0e18, &DetectionConfig::default());
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|c| c.start == 100.0 && c.end == 145.0));
    }

    #[test]
    fn test_scan_tail_still_limits_last_window() {
        // last window start 150 - 30 = 120 > 90, so 45..=90 are all scanned
        let candidates =
            detect_candidates(&sponsor_read(), None, 150.0, &DetectionConfig::default());
        assert_eq!(candidates.len(), 4);

        // duration 80: last start 50, only window 45 holds all three matches
        let candidates =
            detect_candidates(&sponsor_read(), None, 80.0, &DetectionConfig::default());
        assert_eq!(candidates.len(), 1);
    }
}
