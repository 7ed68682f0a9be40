//! Task parallelism use case

use tracing::{debug, info};

use crate::config::DetectionConfig;
use crate::errors::{PatternError, Result};
use crate::features::pet_graph::PetGraph;
use crate::features::task_parallelism::domain::{TaskParallelismResult, TaskPragma};
use crate::features::task_parallelism::infrastructure::{
    BarrierFixpoint, RoleClassifier, SuggestionSynthesizer, TaskMerger, TaskTreeBuilder,
};
use crate::features::variable_classification::VariableClassifier;
use crate::shared::models::AnalysisFacts;

/// Runs the whole task-parallelism analysis from the entry function
#[derive(Debug, Clone)]
pub struct TaskParallelismDetector {
    entry_function: String,
    trees: TaskTreeBuilder,
    merger: Option<TaskMerger>,
    fixpoint: BarrierFixpoint,
}

impl Default for TaskParallelismDetector {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

impl TaskParallelismDetector {
    pub fn from_config(config: &DetectionConfig) -> Self {
        let merger = config.merge_task_trees.then(|| {
            TaskMerger::new(
                config.workload_threshold,
                config.min_parallelism,
                config.neighbour_line_gap,
            )
        });
        Self {
            entry_function: config.entry_function.clone(),
            trees: TaskTreeBuilder::new(config.fork_sentinel_line),
            merger,
            fixpoint: BarrierFixpoint::new(config.max_fixpoint_iterations),
        }
    }

    /// Fails if the entry function is missing or barrier inference does
    /// not converge; nothing partial is returned then.
    pub fn detect(
        &self,
        graph: &PetGraph,
        facts: &AnalysisFacts,
        classifier: &dyn VariableClassifier,
    ) -> Result<TaskParallelismResult> {
        let entry = graph
            .function_named(&self.entry_function)
            .ok_or_else(|| PatternError::MissingEntryNode(self.entry_function.clone()))?;

        let roles = RoleClassifier::new().classify(graph);

        let mut forks = self.trees.build(graph, &roles, entry);
        if let Some(merger) = &self.merger {
            for fork in &mut forks {
                merger.merge(fork);
            }
            debug!("merged {} task trees", forks.len());
        }

        let (regions, suggestions) = SuggestionSynthesizer::new(graph, facts, &roles, classifier).synthesize();
        let outcome = self.fixpoint.run(graph, suggestions)?;

        for s in &outcome.suggestions {
            let kind = match &s.suggestion.pragma {
                TaskPragma::Task => "task",
                TaskPragma::Taskwait => "taskwait",
                TaskPragma::TaskloopReduction { .. } => "taskloop reduction",
            };
            info!(
                "{} suggested at {} (node {})",
                kind, s.suggestion.pragma_line, s.suggestion.info.node_id
            );
        }
        for r in &regions {
            info!(
                "parallel region in {} lines {}-{}",
                r.info.node_id, r.region_start_line, r.region_end_line
            );
        }

        Ok(TaskParallelismResult {
            regions,
            suggestions: outcome.suggestions.into_iter().map(|s| s.suggestion).collect(),
            forks,
            omittable: outcome.omittable.into_iter().map(|n| graph.node(n).id).collect(),
            roles: roles.by_id(graph),
        })
    }
}
