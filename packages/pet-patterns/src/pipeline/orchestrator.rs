//! Detection orchestrator
//!
//! Pass order is fixed: pipeline, reduction, do-all, task parallelism,
//! geometric decomposition. Do-all skips reduction loops, and geometric
//! decomposition reads the do-all/reduction flags.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::suggestion::PatternSuggestion;
use crate::config::{DetectionConfig, Validatable};
use crate::errors::{PatternError, Result};
use crate::features::geometric_decomposition::GeometricDecompositionDetector;
use crate::features::loop_parallelism::{DoAllDetector, ReductionDetector};
use crate::features::pet_graph::{IngestReport, PetGraph, PetGraphBuilder, PetInput};
use crate::features::pipeline_pattern::PipelineDetector;
use crate::features::task_parallelism::{Task, TaskParallelismDetector};
use crate::features::variable_classification::{DependencyVariableClassifier, VariableClassifier};
use crate::shared::models::{AnalysisFacts, NodeId};

/// Counts per suggestion kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    pub nodes: usize,
    pub edges: usize,
    pub pipelines: usize,
    pub reductions: usize,
    pub do_all: usize,
    pub tasks: usize,
    pub taskwaits: usize,
    pub parallel_regions: usize,
    pub geometric_decompositions: usize,
}

impl DetectionStats {
    fn count(&mut self, suggestion: &PatternSuggestion) {
        match suggestion {
            PatternSuggestion::Pipeline(_) => self.pipelines += 1,
            PatternSuggestion::Reduction(_) => self.reductions += 1,
            PatternSuggestion::DoAll(_) => self.do_all += 1,
            PatternSuggestion::Task(_) => self.tasks += 1,
            PatternSuggestion::Taskwait(_) => self.taskwaits += 1,
            PatternSuggestion::ParallelRegion(_) => self.parallel_regions += 1,
            PatternSuggestion::GeometricDecomposition(_) => self.geometric_decompositions += 1,
        }
    }
}

/// Result of one detection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// In pass order
    pub suggestions: Vec<PatternSuggestion>,
    /// Fork task trees, entry function first (empty if task parallelism is off)
    pub task_trees: Vec<Task>,
    pub omittable: Vec<NodeId>,
    pub stats: DetectionStats,
}

impl DetectionReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggestions of one kind, e.g. `"task"`
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a PatternSuggestion> + 'a {
        self.suggestions.iter().filter(move |s| s.kind() == kind)
    }
}

/// Runs every enabled detector over a graph
pub struct PatternDetector {
    config: DetectionConfig,
    classifier: Box<dyn VariableClassifier>,
}

impl std::fmt::Debug for PatternDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternDetector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PatternDetector {
    /// Fails if `config` does not validate
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: Box::new(DependencyVariableClassifier::new()),
        })
    }

    /// Replace the default [`DependencyVariableClassifier`]
    pub fn with_classifier(mut self, classifier: Box<dyn VariableClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run all enabled passes
    ///
    /// Writes the pattern flags on the graph's nodes. A missing entry
    /// function is reported before any pass runs. Passes work on a copy
    /// that replaces `graph` only once every pass succeeded, so an error
    /// leaves `graph` untouched.
    pub fn detect(&self, graph: &mut PetGraph, facts: &AnalysisFacts) -> Result<DetectionReport> {
        let config = &self.config;
        if config.detect_task_parallelism && graph.function_named(&config.entry_function).is_none() {
            return Err(PatternError::MissingEntryNode(config.entry_function.clone()));
        }

        let mut work = graph.clone();
        let report = self.run_passes(&mut work, facts)?;
        *graph = work;
        Ok(report)
    }

    fn run_passes(&self, graph: &mut PetGraph, facts: &AnalysisFacts) -> Result<DetectionReport> {
        let config = &self.config;
        let classifier = self.classifier.as_ref();
        let mut report = DetectionReport::default();

        if config.detect_pipeline {
            let found = PipelineDetector::new().detect(graph);
            report.suggestions.extend(found.into_iter().map(PatternSuggestion::Pipeline));
        }
        if config.detect_reduction {
            let found = ReductionDetector::new().detect(graph, facts);
            report.suggestions.extend(found.into_iter().map(PatternSuggestion::Reduction));
        }
        if config.detect_do_all {
            let found = DoAllDetector::new(config.do_all_threshold).detect(graph, facts, classifier);
            report.suggestions.extend(found.into_iter().map(PatternSuggestion::DoAll));
        }
        if config.detect_task_parallelism {
            let result = TaskParallelismDetector::from_config(config).detect(graph, facts, classifier)?;
            report
                .suggestions
                .extend(result.regions.into_iter().map(PatternSuggestion::ParallelRegion));
            report
                .suggestions
                .extend(result.suggestions.into_iter().map(PatternSuggestion::from));
            report.task_trees = result.forks;
            report.omittable = result.omittable;
        }
        if config.detect_geometric_decomposition {
            let found = GeometricDecompositionDetector::new().detect(graph, facts, classifier);
            report
                .suggestions
                .extend(found.into_iter().map(PatternSuggestion::GeometricDecomposition));
        }

        report.stats.nodes = graph.node_count();
        report.stats.edges = graph.edge_count();
        for s in &report.suggestions {
            report.stats.count(s);
        }

        info!(
            "detection finished: {} suggestions ({} do-all, {} reduction, {} pipeline, {} task, {} taskwait, {} gd)",
            report.suggestions.len(),
            report.stats.do_all,
            report.stats.reductions,
            report.stats.pipelines,
            report.stats.tasks,
            report.stats.taskwaits,
            report.stats.geometric_decompositions
        );
        Ok(report)
    }
}

/// Build the graph from `input` and run every pass enabled in `config`
pub fn analyze(
    input: &PetInput,
    facts: &AnalysisFacts,
    config: DetectionConfig,
) -> Result<(DetectionReport, IngestReport)> {
    let detector = PatternDetector::new(config)?;
    let (mut graph, ingest) = PetGraphBuilder::new()
        .remove_dummy_children(detector.config().remove_dummy_children)
        .build(input, facts)?;
    let report = detector.detect(&mut graph, facts)?;
    Ok((report, ingest))
}
