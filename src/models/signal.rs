use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SignalCategory {
    /// Framing phrase that opens a read ("sponsored by").
    Start,
    /// Call to action that usually closes a read ("use code").
    End,
    Brand,
    Topic,
    Weak,
}

impl SignalCategory {
    pub const ALL: [SignalCategory; 5] = [
        SignalCategory::Start,
        SignalCategory::End,
        SignalCategory::Brand,
        SignalCategory::Topic,
        SignalCategory::Weak,
    ];

    pub fn weight(&self) -> u32 {
        match self {
            SignalCategory::Start => 10,
            SignalCategory::End => 8,
            SignalCategory::Brand => 12,
            SignalCategory::Topic => 3,
            SignalCategory::Weak => 2,
        }
    }

    /// Strong categories are the only ones allowed to carry a candidate on their own.
    pub fn is_strong(&self) -> bool {
        matches!(
            self,
            SignalCategory::Start | SignalCategory::End | SignalCategory::Brand
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalCategory::Start => "start",
            SignalCategory::End => "end",
            SignalCategory::Brand => "brand",
            SignalCategory::Topic => "topic",
            SignalCategory::Weak => "weak",
        }
    }
}

/// A single phrase occurrence inside one transcript unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignalMatch {
    /// Start of the transcript unit the phrase was found in.
    pub time: f64,
    pub category: SignalCategory,
    pub phrase: String,
    pub weight: u32,
}

impl SignalMatch {
    pub fn new(time: f64, category: SignalCategory, phrase: impl Into<String>) -> Self {
        Self {
            time,
            category,
            phrase: phrase.into(),
            weight: category.weight(),
        }
    }
}
