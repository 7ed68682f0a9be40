use serde::{Deserialize, Serialize};

use crate::shared::models::{NodeId, PatternInfo};

/// Loop whose body stages form a producer/consumer chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub info: PatternInfo,
    /// Cosine similarity between observed and ideal stage dependencies
    pub score: f64,
    pub stages: Vec<NodeId>,
}
