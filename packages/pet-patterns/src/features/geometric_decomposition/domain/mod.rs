use serde::{Deserialize, Serialize};

use crate::features::variable_classification::VariableClassification;
use crate::shared::models::{NodeId, PatternInfo};

/// Loop nest partitionable into chunked tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdInfo {
    pub info: PatternInfo,
    pub do_all_children: Vec<NodeId>,
    pub reduction_children: Vec<NodeId>,
    /// Chunk limit: smallest per-parent iteration count of the inner loops
    pub min_iter: u64,
    pub num_tasks: u64,
    pub pragma: String,
    /// Always carries the implicit `int i` chunk index as first-private
    pub variables: VariableClassification,
}
