pub mod barrier_fixpoint;
pub mod classification;
pub mod merging;
pub mod parent_search;
pub mod suggestions;
pub mod task_tree;

#[cfg(test)]
mod edge_case_tests;

pub use barrier_fixpoint::{BarrierFixpoint, FixpointOutcome};
pub use classification::RoleClassifier;
pub use merging::TaskMerger;
pub use parent_search::{parents_of_kind, reaches};
pub use suggestions::{assign_region_lines, LocatedSuggestion, SuggestionSynthesizer};
pub use task_tree::TaskTreeBuilder;
