//! Task parallelism feature
//!
//! ```text
//! application/ (TaskParallelismDetector)
//!        |
//! infrastructure/ roles -> task trees -> merging -> suggestions -> barrier inference
//!        |
//! domain/ (MwType, Task, TaskSuggestion)
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::TaskParallelismDetector;
pub use domain::*;

#[doc(hidden)]
pub use infrastructure::{
    BarrierFixpoint, RoleClassifier, SuggestionSynthesizer, TaskMerger, TaskTreeBuilder,
};
