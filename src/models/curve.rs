use serde::{Deserialize, Serialize};

/// Raw engagement curve as handed over by the curve provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePayload {
    /// Path command string, e.g. `"M 0,100 C 1,90 2,80 3,70"`.
    pub path: String,
    pub width: f64,
    pub height: f64,
}

/// Point in curve-local coordinates. Larger `y` means lower engagement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurveSlope {
    /// Video time (seconds) at the left point of the step.
    pub time: f64,
    pub slope: f64,
    pub engagement: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurveValley {
    pub start: f64,
    pub end: f64,
}

impl CurveValley {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.start <= end && self.end >= start
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurveAnalysis {
    pub points: Vec<CurvePoint>,
    pub slopes: Vec<CurveSlope>,
    pub valleys: Vec<CurveValley>,
    pub max_slope: f64,
    pub max_slope_time: f64,
}

impl CurveAnalysis {
    pub fn has_valleys(&self) -> bool {
        !self.valleys.is_empty()
    }
}
