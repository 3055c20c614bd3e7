pub mod cluster;
pub mod config;
pub mod merge;
pub mod phrases;
pub mod scanner;
pub mod scoring;

pub use cluster::detect_candidates;
pub use config::DetectionConfig;
pub use merge::{merge_segments, rank_segments};
pub use scanner::scan_signals;

use crate::models::{CurveAnalysis, FinalSegment, TranscriptUnit};
use crate::{log_debug, log_info};

const ENABLE_LOGS: bool = true;

/// Main detection function: transcript (+ optional curve) into final segments.
///
/// Deterministic for identical inputs. Every "nothing found" path returns
/// an empty vector.
pub fn detect_sponsors(
    units: &[TranscriptUnit],
    curve: Option<&CurveAnalysis>,
    duration: f64,
    config: &DetectionConfig,
) -> Vec<FinalSegment> {
    // Edge case: no transcript
    if units.is_empty() {
        return Vec::new();
    }

    // Step 1: Scan for phrase signals
    let matches = scan_signals(units);
    log_debug!("Scanned {} units, {} signal matches", units.len(), matches.len());
    if matches.is_empty() {
        return Vec::new();
    }

    // Step 2: Window scan into candidates
    let candidates = detect_candidates(&matches, curve, duration, config);
    log_debug!("{} candidate windows accepted", candidates.len());
    if candidates.is_empty() {
        return Vec::new();
    }

    // Step 3: Merge overlapping candidates
    let merged = merge_segments(candidates, config);
    log_info!("Detected {} sponsor segment(s)", merged.len());

    merged
}
