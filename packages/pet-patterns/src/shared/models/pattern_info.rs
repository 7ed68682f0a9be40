use serde::{Deserialize, Serialize};

use super::{NodeId, SourcePosition};

/// Common header of every pattern record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInfo {
    pub node_id: NodeId,
    pub start_line: SourcePosition,
    pub end_line: SourcePosition,
    pub instructions_count: u64,
    pub workload: u64,
}
