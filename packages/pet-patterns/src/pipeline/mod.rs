//! Detection pipeline
//!
//! Runs the feature detectors over one graph in their required order and
//! collects a single report.

mod orchestrator;
mod suggestion;

pub use orchestrator::{analyze, DetectionReport, DetectionStats, PatternDetector};
pub use suggestion::PatternSuggestion;
