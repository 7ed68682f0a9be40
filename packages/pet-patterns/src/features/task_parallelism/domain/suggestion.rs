//! Task-parallelism suggestion records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::role::MwType;
use super::task::Task;
use crate::shared::models::{NodeId, PatternInfo, SourcePosition};

/// Directive kind of a task suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskPragma {
    Task,
    Taskwait,
    /// Task inside a reduction loop, rewritten as `taskloop reduction(op:var)`
    TaskloopReduction { operation: String, variable: String },
}

impl TaskPragma {
    pub fn is_taskwait(&self) -> bool {
        matches!(self, TaskPragma::Taskwait)
    }

    /// Directive words, e.g. `["taskloop", "reduction(+:sum)"]`
    pub fn words(&self) -> Vec<String> {
        match self {
            TaskPragma::Task => vec!["task".to_string()],
            TaskPragma::Taskwait => vec!["taskwait".to_string()],
            TaskPragma::TaskloopReduction { operation, variable } => vec![
                "taskloop".to_string(),
                format!("reduction({}:{})", operation, variable),
            ],
        }
    }
}

/// Task or taskwait directive attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSuggestion {
    pub info: PatternInfo,
    pub pragma: TaskPragma,
    /// Line the directive goes in front of
    pub pragma_line: SourcePosition,
    pub region_start_line: u32,
    pub region_end_line: u32,
    pub first_private: Vec<String>,
    pub private: Vec<String>,
    pub shared: Vec<String>,
}

/// `parallel` + `single` region around an outermost call chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelRegionInfo {
    pub info: PatternInfo,
    pub region_start_line: SourcePosition,
    pub region_end_line: SourcePosition,
}

/// Everything the task-parallelism pass produces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskParallelismResult {
    pub regions: Vec<ParallelRegionInfo>,
    pub suggestions: Vec<TaskSuggestion>,
    /// Task trees, entry function first
    pub forks: Vec<Task>,
    /// Nodes whose single task dependency needs no extra synchronisation
    pub omittable: Vec<NodeId>,
    pub roles: BTreeMap<NodeId, MwType>,
}
