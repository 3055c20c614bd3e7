use std::collections::BTreeSet;

use crate::detection::config::DetectionConfig;
use crate::models::{Confidence, CurveAnalysis, SignalCategory, SignalMatch};

/// Aggregate lexical evidence for one window.
#[derive(Debug, Clone)]
pub struct WindowScore {
    pub score: u32,
    pub categories: BTreeSet<SignalCategory>,
    pub strong_count: usize,
}

impl WindowScore {
    pub fn signal_type_count(&self) -> usize {
        self.categories.len()
    }

    pub fn has(&self, category: SignalCategory) -> bool {
        self.categories.contains(&category)
    }
}

pub fn score_window(matches: &[&SignalMatch]) -> WindowScore {
    let score = matches.iter().map(|m| m.weight).sum();
    let categories = matches.iter().map(|m| m.category).collect();
    let strong_count = matches.iter().filter(|m| m.category.is_strong()).count();

    WindowScore {
        score,
        categories,
        strong_count,
    }
}

/// Score floor for a window. A curve with valleys lowers the lexical bar;
/// a missing curve and a curve without valleys are treated alike here.
pub fn minimum_score(curve: Option<&CurveAnalysis>, config: &DetectionConfig) -> u32 {
    match curve {
        Some(analysis) if analysis.has_valleys() => config.min_score_with_valleys,
        _ => config.min_score_without_valleys,
    }
}

/// Lexical-only detections need a framing marker corroborated by a call
/// to action or a brand, or a brand corroborated by a call to action.
pub fn has_corroboration(window: &WindowScore) -> bool {
    let start = window.has(SignalCategory::Start);
    let end = window.has(SignalCategory::End);
    let brand = window.has(SignalCategory::Brand);

    (brand && end) || (start && end) || (start && brand)
}

pub fn classify_confidence(
    score: u32,
    signal_type_count: usize,
    config: &DetectionConfig,
) -> Confidence {
    if score >= config.high_min_score && signal_type_count >= config.high_min_types {
        Confidence::High
    } else if score >= config.medium_min_score && signal_type_count >= config.medium_min_types {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}
