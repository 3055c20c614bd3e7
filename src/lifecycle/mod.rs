pub mod controller;
pub mod state;

pub use controller::{AnalysisController, AnalysisOutcome};
pub use state::{AnalysisState, AnalysisStatus, AnalysisTicket};
