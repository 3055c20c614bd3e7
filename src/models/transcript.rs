use serde::{Deserialize, Serialize};

/// One timestamped line of a video transcript. Times are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptUnit {
    pub start: f64,
    /// Zero when the source does not report a duration.
    #[serde(default)]
    pub duration: f64,
    pub text: String,
}

impl TranscriptUnit {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start: start.max(0.0),
            duration: duration.max(0.0),
            text: text.into(),
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Stable sort by start time. Providers do not always hand units back in order.
pub fn sort_units(units: &mut [TranscriptUnit]) {
    units.sort_by(|a, b| a.start.total_cmp(&b.start));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_negative_times() {
        let unit = TranscriptUnit::new(-3.0, -1.0, "hello");
        assert_eq!(unit.start, 0.0);
        assert_eq!(unit.duration, 0.0);
    }

    #[test]
    fn test_sort_units_keeps_equal_starts_in_order() {
        let mut units = vec![
            TranscriptUnit::new(5.0, 1.0, "b"),
            TranscriptUnit::new(1.0, 1.0, "a"),
            TranscriptUnit::new(5.0, 1.0, "c"),
        ];
        sort_units(&mut units);
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
