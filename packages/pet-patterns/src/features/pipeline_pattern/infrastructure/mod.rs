pub mod pipeline_detector;

pub use pipeline_detector::PipelineDetector;
