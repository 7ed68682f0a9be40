//! Patch type with all-optional fields

use serde::{Deserialize, Serialize};

use super::detection_config::DetectionConfig;

/// Partial [`DetectionConfig`], applied on top of a preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectionConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_all_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload_threshold: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_parallelism: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbour_line_gap: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_sentinel_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fixpoint_iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_dummy_children: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_task_trees: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_pipeline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_do_all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_reduction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_geometric_decomposition: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_task_parallelism: Option<bool>,
}

impl DetectionConfig {
    /// Apply patch (overwrites only the fields it sets)
    pub fn apply_patch(mut self, patch: DetectionConfigPatch) -> Self {
        if let Some(v) = patch.do_all_threshold {
            self.do_all_threshold = v;
        }
        if let Some(v) = patch.workload_threshold {
            self.workload_threshold = v;
        }
        if let Some(v) = patch.min_parallelism {
            self.min_parallelism = v;
        }
        if let Some(v) = patch.neighbour_line_gap {
            self.neighbour_line_gap = v;
        }
        if let Some(v) = patch.fork_sentinel_line {
            self.fork_sentinel_line = v;
        }
        if let Some(v) = patch.max_fixpoint_iterations {
            self.max_fixpoint_iterations = v;
        }
        if let Some(v) = patch.entry_function {
            self.entry_function = v;
        }
        if let Some(v) = patch.remove_dummy_children {
            self.remove_dummy_children = v;
        }
        if let Some(v) = patch.merge_task_trees {
            self.merge_task_trees = v;
        }
        if let Some(v) = patch.detect_pipeline {
            self.detect_pipeline = v;
        }
        if let Some(v) = patch.detect_do_all {
            self.detect_do_all = v;
        }
        if let Some(v) = patch.detect_reduction {
            self.detect_reduction = v;
        }
        if let Some(v) = patch.detect_geometric_decomposition {
            self.detect_geometric_decomposition = v;
        }
        if let Some(v) = patch.detect_task_parallelism {
            self.detect_task_parallelism = v;
        }
        self
    }
}

impl From<&DetectionConfig> for DetectionConfigPatch {
    fn from(c: &DetectionConfig) -> Self {
        Self {
            do_all_threshold: Some(c.do_all_threshold),
            workload_threshold: Some(c.workload_threshold),
            min_parallelism: Some(c.min_parallelism),
            neighbour_line_gap: Some(c.neighbour_line_gap),
            fork_sentinel_line: Some(c.fork_sentinel_line),
            max_fixpoint_iterations: Some(c.max_fixpoint_iterations),
            entry_function: Some(c.entry_function.clone()),
            remove_dummy_children: Some(c.remove_dummy_children),
            merge_task_trees: Some(c.merge_task_trees),
            detect_pipeline: Some(c.detect_pipeline),
            detect_do_all: Some(c.detect_do_all),
            detect_reduction: Some(c.detect_reduction),
            detect_geometric_decomposition: Some(c.detect_geometric_decomposition),
            detect_task_parallelism: Some(c.detect_task_parallelism),
        }
    }
}
