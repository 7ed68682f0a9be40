//! Detector configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigFileV1;
use super::preset::Preset;
use super::validation::{check_range, Validatable};
use crate::shared::constants::*;

/// Supported YAML schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Thresholds and switches of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Cosine similarity a loop must exceed to count as do-all
    pub do_all_threshold: f64,
    /// Tasks lighter than this are merged away
    pub workload_threshold: u64,
    /// Minimum child count before the heaviest child is hoisted
    pub min_parallelism: usize,
    /// Line distance still considered adjacent when merging tasks
    pub neighbour_line_gap: u32,
    /// Start line of synthetic FORK nodes that never open a task
    pub fork_sentinel_line: u32,
    pub max_fixpoint_iterations: usize,
    /// FUNC node the task tree is rooted at
    pub entry_function: String,
    /// Drop CHILD edges into DUMMY nodes after the graph is built
    ///
    /// Placeholders created for dangling CHILD references are DUMMY nodes,
    /// so with this on (the default) such edges are removed and only the
    /// ingestion warning remains. Turn it off to keep them.
    pub remove_dummy_children: bool,
    pub merge_task_trees: bool,

    pub detect_pipeline: bool,
    pub detect_do_all: bool,
    pub detect_reduction: bool,
    pub detect_geometric_decomposition: bool,
    pub detect_task_parallelism: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl DetectionConfig {
    pub fn from_preset(preset: Preset) -> Self {
        let base = Self {
            do_all_threshold: DEFAULT_DO_ALL_THRESHOLD,
            workload_threshold: DEFAULT_WORKLOAD_THRESHOLD,
            min_parallelism: DEFAULT_MIN_PARALLELISM,
            neighbour_line_gap: DEFAULT_NEIGHBOUR_LINE_GAP,
            fork_sentinel_line: FORK_SENTINEL_LINE,
            max_fixpoint_iterations: DEFAULT_MAX_FIXPOINT_ITERATIONS,
            entry_function: DEFAULT_ENTRY_FUNCTION.to_string(),
            remove_dummy_children: true,
            merge_task_trees: true,
            detect_pipeline: true,
            detect_do_all: true,
            detect_reduction: true,
            detect_geometric_decomposition: true,
            detect_task_parallelism: true,
        };

        match preset {
            Preset::Fast => Self {
                detect_geometric_decomposition: false,
                detect_task_parallelism: false,
                ..base
            },
            Preset::Balanced => base,
            Preset::Thorough => Self {
                max_fixpoint_iterations: DEFAULT_MAX_FIXPOINT_ITERATIONS * 10,
                ..base
            },
        }
    }

    pub fn do_all_threshold(mut self, threshold: f64) -> Self {
        self.do_all_threshold = threshold;
        self
    }

    pub fn workload_threshold(mut self, threshold: u64) -> Self {
        self.workload_threshold = threshold;
        self
    }

    pub fn min_parallelism(mut self, n: usize) -> Self {
        self.min_parallelism = n;
        self
    }

    pub fn max_fixpoint_iterations(mut self, n: usize) -> Self {
        self.max_fixpoint_iterations = n;
        self
    }

    pub fn entry_function(mut self, name: impl Into<String>) -> Self {
        self.entry_function = name.into();
        self
    }

    pub fn merge_task_trees(mut self, enabled: bool) -> Self {
        self.merge_task_trees = enabled;
        self
    }

    /// Parse a v1 YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match file.preset.as_deref() {
            Some(name) => name.parse()?,
            None => Preset::default(),
        };

        let mut config = Self::from_preset(preset);
        if let Some(patch) = file.detection {
            config = config.apply_patch(patch);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export as a v1 YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: None,
            detection: Some(self.into()),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl Validatable for DetectionConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "do_all_threshold",
            self.do_all_threshold,
            0.0,
            1.0,
            "Cosine similarity is bounded by 1.0",
        )?;
        check_range(
            "min_parallelism",
            self.min_parallelism,
            1,
            64,
            "At least one child task is required",
        )?;
        check_range(
            "neighbour_line_gap",
            self.neighbour_line_gap,
            0,
            100,
            "Large gaps merge unrelated tasks",
        )?;
        check_range(
            "max_fixpoint_iterations",
            self.max_fixpoint_iterations,
            1,
            1_000_000,
            "The barrier pass needs at least one scan",
        )?;
        if self.entry_function.trim().is_empty() {
            return Err(ConfigError::Empty("entry_function".to_string()));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "DetectionConfig"
    }
}
