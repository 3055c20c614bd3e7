use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Low
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSegment {
    pub start: f64,
    pub end: f64,
    pub score: u32,
    pub signal_type_count: usize,
    pub confidence: Confidence,
    pub keywords: BTreeSet<String>,
}

impl CandidateSegment {
    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }
}

/// Merged, de-duplicated segment handed to the result consumer.
pub type FinalSegment = CandidateSegment;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
        assert_eq!(Confidence::Low.max(Confidence::High), Confidence::High);
    }

    #[test]
    fn test_segment_serializes_camel_case() {
        let segment = CandidateSegment {
            start: 10.0,
            end: 70.0,
            score: 32,
            signal_type_count: 2,
            confidence: Confidence::Medium,
            keywords: ["nordvpn".to_string()].into_iter().collect(),
        };
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["signalTypeCount"], 2);
        assert_eq!(json["confidence"], "medium");
        assert_eq!(json["keywords"][0], "nordvpn");
    }
}
