//! Kind-tagged suggestion records

use serde::{Deserialize, Serialize};

use crate::features::geometric_decomposition::GdInfo;
use crate::features::loop_parallelism::{DoAllInfo, ReductionInfo};
use crate::features::pipeline_pattern::PipelineInfo;
use crate::features::task_parallelism::{ParallelRegionInfo, TaskPragma, TaskSuggestion};
use crate::shared::models::PatternInfo;

/// One record handed to directive rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternSuggestion {
    Pipeline(PipelineInfo),
    DoAll(DoAllInfo),
    Reduction(ReductionInfo),
    GeometricDecomposition(GdInfo),
    Task(TaskSuggestion),
    Taskwait(TaskSuggestion),
    ParallelRegion(ParallelRegionInfo),
}

impl PatternSuggestion {
    pub fn info(&self) -> &PatternInfo {
        match self {
            PatternSuggestion::Pipeline(p) => &p.info,
            PatternSuggestion::DoAll(p) => &p.info,
            PatternSuggestion::Reduction(p) => &p.info,
            PatternSuggestion::GeometricDecomposition(p) => &p.info,
            PatternSuggestion::Task(p) | PatternSuggestion::Taskwait(p) => &p.info,
            PatternSuggestion::ParallelRegion(p) => &p.info,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PatternSuggestion::Pipeline(_) => "pipeline",
            PatternSuggestion::DoAll(_) => "do_all",
            PatternSuggestion::Reduction(_) => "reduction",
            PatternSuggestion::GeometricDecomposition(_) => "geometric_decomposition",
            PatternSuggestion::Task(_) => "task",
            PatternSuggestion::Taskwait(_) => "taskwait",
            PatternSuggestion::ParallelRegion(_) => "parallel_region",
        }
    }
}

impl From<TaskSuggestion> for PatternSuggestion {
    fn from(s: TaskSuggestion) -> Self {
        match s.pragma {
            TaskPragma::Taskwait => PatternSuggestion::Taskwait(s),
            TaskPragma::Task | TaskPragma::TaskloopReduction { .. } => PatternSuggestion::Task(s),
        }
    }
}
