//! Seams to the collaborators that feed and consume an analysis pass.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::captions::{
    fetch_transcript, parse_initial_data, parse_panel_text, CaptionFetcher, PlayerData,
};
use crate::log_debug;
use crate::models::{CurvePayload, FinalSegment, TranscriptUnit};

const ENABLE_LOGS: bool = true;

/// The video an analysis pass runs for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoContext {
    pub video_id: String,
    /// Real video length in seconds
    pub duration: f64,
    pub captions_url: Option<String>,
}

impl VideoContext {
    pub fn new(video_id: impl Into<String>, duration: f64) -> Self {
        Self {
            video_id: video_id.into(),
            duration,
            captions_url: None,
        }
    }

    /// `None` when the player data carries no video id.
    pub fn from_player_data(data: PlayerData) -> Option<Self> {
        Some(Self {
            video_id: data.video_id?,
            duration: data.duration.unwrap_or(0.0),
            captions_url: data.captions_url,
        })
    }
}

#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Time-ordered units, or an empty vector when no transcript exists.
    async fn transcript(&self, video: &VideoContext) -> Vec<TranscriptUnit>;
}

#[async_trait]
pub trait CurveProvider: Send + Sync {
    /// `None` means the curve is unavailable, not merely flat.
    async fn curve(&self, video: &VideoContext) -> Option<CurvePayload>;
}

/// Receives published results for the current video.
pub trait ResultConsumer: Send + Sync {
    /// `segments` are ranked highest score first.
    fn publish(&self, video_id: &str, segments: &[FinalSegment]);

    /// Drop anything rendered for a previous video.
    fn clear(&self);
}

/// Tries each provider in order and keeps the first non-empty transcript.
pub struct ChainedTranscriptProvider {
    providers: Vec<Arc<dyn TranscriptProvider>>,
}

impl ChainedTranscriptProvider {
    pub fn new(providers: Vec<Arc<dyn TranscriptProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl TranscriptProvider for ChainedTranscriptProvider {
    async fn transcript(&self, video: &VideoContext) -> Vec<TranscriptUnit> {
        for (index, provider) in self.providers.iter().enumerate() {
            let units = provider.transcript(video).await;
            if !units.is_empty() {
                log_debug!("Transcript source #{} returned {} units", index, units.len());
                return units;
            }
        }
        Vec::new()
    }
}

/// Reads transcript data embedded in the watch page's script text.
pub struct InitialDataProvider {
    page: String,
}

impl InitialDataProvider {
    pub fn new(page: impl Into<String>) -> Self {
        Self { page: page.into() }
    }
}

#[async_trait]
impl TranscriptProvider for InitialDataProvider {
    async fn transcript(&self, video: &VideoContext) -> Vec<TranscriptUnit> {
        let units = parse_initial_data(&self.page);
        if units.is_empty() {
            log_debug!("No embedded transcript for {}", video.video_id);
        }
        units
    }
}

/// Reads the text of an opened transcript panel.
pub struct PanelTextProvider {
    text: String,
}

impl PanelTextProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TranscriptProvider for PanelTextProvider {
    async fn transcript(&self, _video: &VideoContext) -> Vec<TranscriptUnit> {
        parse_panel_text(&self.text)
    }
}

/// Fetches the caption track named by [`VideoContext::captions_url`].
pub struct CaptionUrlProvider {
    fetcher: Arc<dyn CaptionFetcher>,
}

impl CaptionUrlProvider {
    pub fn new(fetcher: Arc<dyn CaptionFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl TranscriptProvider for CaptionUrlProvider {
    async fn transcript(&self, video: &VideoContext) -> Vec<TranscriptUnit> {
        match &video.captions_url {
            Some(url) => fetch_transcript(self.fetcher.as_ref(), url).await,
            None => {
                log_debug!("No caption URL for {}", video.video_id);
                Vec::new()
            }
        }
    }
}

/// Serves a transcript that is already in memory.
pub struct StaticTranscriptProvider {
    units: Vec<TranscriptUnit>,
}

impl StaticTranscriptProvider {
    pub fn new(units: Vec<TranscriptUnit>) -> Self {
        Self { units }
    }
}

#[async_trait]
impl TranscriptProvider for StaticTranscriptProvider {
    async fn transcript(&self, _video: &VideoContext) -> Vec<TranscriptUnit> {
        self.units.clone()
    }
}

/// Serves a fixed curve payload, or reports the curve as unavailable.
pub struct StaticCurveProvider {
    payload: Option<CurvePayload>,
}

impl StaticCurveProvider {
    pub fn new(payload: Option<CurvePayload>) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl CurveProvider for StaticCurveProvider {
    async fn curve(&self, _video: &VideoContext) -> Option<CurvePayload> {
        self.payload.clone()
    }
}
