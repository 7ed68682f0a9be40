pub mod do_all_detector;
pub mod reduction_detector;

pub use do_all_detector::DoAllDetector;
pub use reduction_detector::ReductionDetector;

#[cfg(test)]
mod edge_case_tests;
