use petgraph::stable_graph::NodeIndex;
use tracing::{debug, info};

use crate::features::loop_parallelism::domain::DoAllInfo;
use crate::features::pet_graph::PetGraph;
use crate::features::variable_classification::{PatternContext, VariableClassifier};
use crate::shared::constants::DEFAULT_DO_ALL_THRESHOLD;
use crate::shared::models::{AnalysisFacts, NodeKind};
use crate::shared::utils::similarity::cosine_similarity;

/// Flags loops whose direct children are pairwise independent
///
/// Must run after [`ReductionDetector`](super::ReductionDetector): reduction
/// loops get the flag but no suggestion.
#[derive(Debug, Clone, Copy)]
pub struct DoAllDetector {
    threshold: f64,
}

impl Default for DoAllDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DO_ALL_THRESHOLD)
    }
}

impl DoAllDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Similarity of the pairwise-independence vector with all-ones
    ///
    /// Pairs `(i, j)` with `i <= j` over the direct children; an entry is 1
    /// when child `i` does not depend on child `j`.
    pub fn score(graph: &PetGraph, loop_node: NodeIndex) -> f64 {
        let scope = graph.loop_scope(loop_node);
        let subnodes = graph.children(loop_node);

        let mut observed = Vec::with_capacity(subnodes.len() * (subnodes.len() + 1) / 2);
        for i in 0..subnodes.len() {
            for j in i..subnodes.len() {
                let dependent = graph.depends_ignore_readonly(subnodes[i], subnodes[j], &scope);
                observed.push(if dependent { 0.0 } else { 1.0 });
            }
        }
        let reference = vec![1.0; observed.len()];
        cosine_similarity(&observed, &reference)
    }

    pub fn detect(
        &self,
        graph: &mut PetGraph,
        facts: &AnalysisFacts,
        classifier: &dyn VariableClassifier,
    ) -> Vec<DoAllInfo> {
        let mut result = Vec::new();
        for loop_node in graph.nodes_of_kind(NodeKind::Loop) {
            let score = Self::score(graph, loop_node);
            debug!("do-all score {} = {:.4}", graph.node(loop_node).id, score);
            if score <= self.threshold {
                continue;
            }

            graph.node_mut(loop_node).do_all = true;
            if graph.node(loop_node).reduction {
                continue;
            }

            info!("Do-all at {} (score {:.4})", graph.node(loop_node).id, score);
            let variables = classifier.classify(graph, facts, loop_node, PatternContext::DoAll, &[], &[]);
            result.push(DoAllInfo {
                info: graph.pattern_info(loop_node),
                score,
                variables,
            });
        }
        result
    }
}
