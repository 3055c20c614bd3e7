use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FinalSegment;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStatus {
    Idle,
    Analyzing,
    Complete,
}

impl Default for AnalysisStatus {
    fn default() -> Self {
        AnalysisStatus::Idle
    }
}

/// Issued when a pass starts; the pass may only publish while its
/// generation is still the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    pub video_id: String,
    pub generation: u64,
}

/// Per-video analysis context, owned by the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisState {
    pub status: AnalysisStatus,
    pub video_id: Option<String>,
    /// Bumped on every begin and reset. Stale tickets carry an older value.
    pub generation: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub segments: Vec<FinalSegment>,
}

impl AnalysisState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pass for `video_id`.
    ///
    /// Returns `None` if that video is already complete or already being
    /// analyzed. A different video abandons whatever was in flight.
    pub fn begin(&mut self, video_id: &str, now: DateTime<Utc>) -> Option<AnalysisTicket> {
        if self.video_id.as_deref() == Some(video_id)
            && matches!(self.status, AnalysisStatus::Analyzing | AnalysisStatus::Complete)
        {
            return None;
        }

        let generation = self.generation.wrapping_add(1);
        *self = Self {
            status: AnalysisStatus::Analyzing,
            video_id: Some(video_id.to_string()),
            generation,
            started_at: Some(now),
            completed_at: None,
            segments: Vec::new(),
        };

        Some(AnalysisTicket {
            video_id: video_id.to_string(),
            generation,
        })
    }

    pub fn is_current(&self, ticket: &AnalysisTicket) -> bool {
        self.generation == ticket.generation
            && self.status == AnalysisStatus::Analyzing
            && self.video_id.as_deref() == Some(ticket.video_id.as_str())
    }

    /// Record results for `ticket`. Returns `false` and leaves the state
    /// untouched when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: &AnalysisTicket,
        segments: Vec<FinalSegment>,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = AnalysisStatus::Complete;
        self.completed_at = Some(now);
        self.segments = segments;
        true
    }

    /// Navigation: back to idle with no video, invalidating every ticket.
    pub fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }
}
