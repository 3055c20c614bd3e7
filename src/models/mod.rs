pub mod curve;
pub mod segment;
pub mod signal;
pub mod transcript;

pub use curve::{CurveAnalysis, CurvePayload, CurvePoint, CurveSlope, CurveValley};
pub use segment::{CandidateSegment, Confidence, FinalSegment};
pub use signal::{SignalCategory, SignalMatch};
pub use transcript::TranscriptUnit;
