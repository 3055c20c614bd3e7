use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::curve::analyze_curve;
use crate::detection::{detect_sponsors, rank_segments};
use crate::models::FinalSegment;
use crate::providers::{CurveProvider, ResultConsumer, TranscriptProvider, VideoContext};
use crate::settings::AnalysisSettings;
use crate::utils::format_time;
use crate::{log_info, log_warn};

use super::{AnalysisState, AnalysisTicket};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The video is already being analyzed or already has results.
    Skipped,
    /// Results were recorded and handed to the consumer (ranked).
    Published(Vec<FinalSegment>),
    /// The video changed while the pass was running; results were dropped.
    Stale,
}

/// Drives one analysis pass per video and guards publication with the
/// current generation.
#[derive(Clone)]
pub struct AnalysisController {
    state: Arc<Mutex<AnalysisState>>,
    transcripts: Arc<dyn TranscriptProvider>,
    curves: Arc<dyn CurveProvider>,
    consumer: Arc<dyn ResultConsumer>,
    settings: AnalysisSettings,
}

impl AnalysisController {
    pub fn new(
        transcripts: Arc<dyn TranscriptProvider>,
        curves: Arc<dyn CurveProvider>,
        consumer: Arc<dyn ResultConsumer>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(AnalysisState::new())),
            transcripts,
            curves,
            consumer,
            settings,
        }
    }

    pub async fn get_state(&self) -> AnalysisState {
        self.state.lock().await.clone()
    }

    pub async fn analyze(&self, video: &VideoContext) -> AnalysisOutcome {
        let ticket = {
            let mut state = self.state.lock().await;
            match state.begin(&video.video_id, Utc::now()) {
                Some(ticket) => ticket,
                None => {
                    log_info!("Skipping {}: analysis already active or complete", video.video_id);
                    return AnalysisOutcome::Skipped;
                }
            }
        };

        log_info!(
            "Analyzing {} (duration {}, generation {})",
            video.video_id,
            format_time(video.duration),
            ticket.generation
        );

        let units = self.transcripts.transcript(video).await;
        if !self.is_current(&ticket).await {
            log_warn!("Dropping transcript for {}: video changed", ticket.video_id);
            return AnalysisOutcome::Stale;
        }

        let segments = if units.is_empty() {
            log_info!("No transcript available for {}", video.video_id);
            Vec::new()
        } else {
            let curve = match self.curves.curve(video).await {
                Some(payload) => analyze_curve(&payload, video.duration, &self.settings.curve),
                None => None,
            };
            if curve.is_none() {
                log_info!("No engagement curve for {}, using lexical gates only", video.video_id);
            }
            detect_sponsors(
                &units,
                curve.as_ref(),
                video.duration,
                &self.settings.detection,
            )
        };

        self.publish(&ticket, segments).await
    }

    /// Navigation: forget the current video and tell the consumer to clear.
    pub async fn navigate(&self) {
        let mut state = self.state.lock().await;
        if let Some(video_id) = state.video_id.as_deref() {
            log_info!("Navigation away from {}", video_id);
        }
        state.reset();
        self.consumer.clear();
    }

    async fn is_current(&self, ticket: &AnalysisTicket) -> bool {
        self.state.lock().await.is_current(ticket)
    }

    async fn publish(
        &self,
        ticket: &AnalysisTicket,
        segments: Vec<FinalSegment>,
    ) -> AnalysisOutcome {
        let ranked = rank_segments(&segments);

        // Held across the consumer call so a navigation cannot interleave.
        let mut state = self.state.lock().await;
        if !state.complete(ticket, segments, Utc::now()) {
            log_warn!("Dropping results for {}: video changed", ticket.video_id);
            return AnalysisOutcome::Stale;
        }

        for (i, segment) in ranked.iter().enumerate() {
            log_info!(
                "Segment {}/{}: {} -> {} [{}] keywords: {}",
                i + 1,
                ranked.len(),
                format_time(segment.start),
                format_time(segment.end),
                segment.confidence.as_str(),
                segment.keywords.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        if !ranked.is_empty() {
            self.consumer.publish(&ticket.video_id, &ranked);
        }

        AnalysisOutcome::Published(ranked)
    }
}
