use serde::{Deserialize, Serialize};

/// Configuration for sponsor detection with tunable thresholds.
///
/// Defaults are the empirically tuned values; a settings file may override
/// any subset of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionConfig {
    /// Sliding window length
    pub window_secs: f64,
    /// Distance between consecutive window starts
    pub step_secs: f64,
    /// Windows stop starting this close to the end of the video
    pub scan_tail_secs: f64,

    /// Minimum matches inside a window before it is scored at all
    pub min_matches: usize,
    /// Score floor when the engagement curve shows at least one valley
    pub min_score_with_valleys: u32,
    /// Score floor when there is no curve or the curve has no valleys
    pub min_score_without_valleys: u32,
    /// Distinct categories required inside a window
    pub min_signal_types: usize,

    /// Padding after the last match to cover the call to action
    pub cta_padding_secs: f64,
    /// Back-off before the first match when no start phrase anchors the segment
    pub lead_in_secs: f64,

    pub min_segment_secs: f64,
    pub max_segment_secs: f64,

    /// Confidence grading
    pub high_min_score: u32,
    pub high_min_types: usize,
    pub medium_min_score: u32,
    pub medium_min_types: usize,

    /// Adjacency tolerance when merging candidates
    pub merge_gap_secs: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_secs: 90.0,
            step_secs: 15.0,
            scan_tail_secs: 30.0,
            min_matches: 3,
            min_score_with_valleys: 15,
            min_score_without_valleys: 25,
            min_signal_types: 2,
            cta_padding_secs: 15.0,
            lead_in_secs: 10.0,
            min_segment_secs: 30.0,
            max_segment_secs: 150.0,
            high_min_score: 30,
            high_min_types: 3,
            medium_min_score: 20,
            medium_min_types: 2,
            merge_gap_secs: 20.0,
        }
    }
}
