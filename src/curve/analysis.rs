use serde::{Deserialize, Serialize};

use crate::curve::path::{extract_points, parse_path};
use crate::models::{CurveAnalysis, CurvePayload, CurvePoint, CurveSlope, CurveValley};
use crate::log_debug;

const ENABLE_LOGS: bool = true;

/// Tunables for curve geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CurveConfig {
    /// Points with `y` above this count as low engagement
    pub low_engagement_y: f64,
    /// Shorter low stretches are not reported as valleys
    pub min_valley_secs: f64,
    /// Used when the payload declares no usable width
    pub fallback_width: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            low_engagement_y: 65.0,
            min_valley_secs: 20.0,
            fallback_width: 1000.0,
        }
    }
}

/// One step between consecutive points with non-zero horizontal delta.
struct Step {
    slope: CurveSlope,
    /// Video time of the right-hand point
    point_time: f64,
    y: f64,
}

/// Analyze an engagement curve against the real video duration.
/// Returns `None` when fewer than two points can be resolved or the
/// duration cannot be mapped onto the curve.
pub fn analyze_curve(
    payload: &CurvePayload,
    video_duration: f64,
    config: &CurveConfig,
) -> Option<CurveAnalysis> {
    if !video_duration.is_finite() || video_duration <= 0.0 {
        log_debug!("Curve ignored: unusable video duration {}", video_duration);
        return None;
    }

    let points = extract_points(&parse_path(&payload.path));
    if points.len() < 2 {
        log_debug!("Curve has {} point(s), not enough to analyze", points.len());
        return None;
    }

    let width = if payload.width.is_finite() && payload.width > 0.0 {
        payload.width
    } else {
        config.fallback_width
    };

    let steps = compute_steps(&points, width, video_duration);

    let mut max_slope = 0.0;
    let mut max_slope_time = 0.0;
    for step in &steps {
        if step.slope.slope > max_slope {
            max_slope = step.slope.slope;
            max_slope_time = step.slope.time;
        }
    }

    let valleys = find_valleys(&steps, config);
    log_debug!(
        "Curve analyzed: {} points, {} valleys, max slope {:.3}",
        points.len(),
        valleys.len(),
        max_slope
    );

    Some(CurveAnalysis {
        slopes: steps.into_iter().map(|s| s.slope).collect(),
        points,
        valleys,
        max_slope,
        max_slope_time,
    })
}

fn compute_steps(points: &[CurvePoint], width: f64, video_duration: f64) -> Vec<Step> {
    points
        .windows(2)
        .filter_map(|pair| {
            let (prev, cur) = (pair[0], pair[1]);
            let dx = cur.x - prev.x;
            if dx == 0.0 {
                return None;
            }
            // vertical axis grows downward
            let slope = -(cur.y - prev.y) / dx;
            Some(Step {
                slope: CurveSlope {
                    time: (prev.x / width) * video_duration,
                    slope,
                    engagement: 100.0 - cur.y,
                },
                point_time: (cur.x / width) * video_duration,
                y: cur.y,
            })
        })
        .collect()
}

/// Maximal runs of low-engagement steps lasting at least `min_valley_secs`.
/// A run spans from its first low point to its last low point.
fn find_valleys(steps: &[Step], config: &CurveConfig) -> Vec<CurveValley> {
    let mut valleys = Vec::new();
    let mut current: Option<(f64, f64)> = None;

    for step in steps {
        if step.y > config.low_engagement_y {
            if let Some(run) = current.as_mut() {
                run.1 = step.point_time;
            } else {
                current = Some((step.point_time, step.point_time));
            }
        } else if let Some(run) = current.take() {
            close_run(run, config, &mut valleys);
        }
    }

    // still low when the curve ends
    if let Some(run) = current {
        close_run(run, config, &mut valleys);
    }

    valleys
}

fn close_run(run: (f64, f64), config: &CurveConfig, valleys: &mut Vec<CurveValley>) {
    let valley = CurveValley {
        start: run.0,
        end: run.1,
    };
    if valley.end > valley.start && valley.duration() >= config.min_valley_secs {
        valleys.push(valley);
    }
}
