pub mod captions;
pub mod curve;
pub mod detection;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod providers;
pub mod settings;
pub mod utils;

pub use captions::{decode_captions, fetch_transcript, CaptionFetcher, HttpCaptionFetcher};
pub use curve::{analyze_curve, CurveConfig};
pub use detection::{detect_sponsors, DetectionConfig};
pub use error::DecodeError;
pub use lifecycle::{AnalysisController, AnalysisOutcome, AnalysisState, AnalysisStatus};
pub use models::{
    CandidateSegment, Confidence, CurveAnalysis, CurvePayload, FinalSegment, SignalCategory,
    SignalMatch, TranscriptUnit,
};
pub use providers::{CurveProvider, ResultConsumer, TranscriptProvider, VideoContext};
pub use settings::{AnalysisSettings, SettingsStore};

/// Initialise `env_logger` at info level unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
