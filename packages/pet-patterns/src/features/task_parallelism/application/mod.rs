//! Task parallelism application layer
//!
//! Entry point for callers; runs role classification, task-tree
//! construction and merging, suggestion synthesis and barrier inference in
//! that order.

mod detect_tasks;

pub use detect_tasks::TaskParallelismDetector;
