use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashSet;
use tracing::info;

use crate::features::loop_parallelism::domain::ReductionInfo;
use crate::features::pet_graph::PetGraph;
use crate::shared::models::{AnalysisFacts, NodeKind, ReductionFact};

/// Flags loops whose variables match the reduction-fact table
#[derive(Debug, Clone, Copy, Default)]
pub struct ReductionDetector;

impl ReductionDetector {
    pub fn new() -> Self {
        Self
    }

    /// Reduction facts matching the variables of `loop_node`'s CU-subtree
    pub fn matching_facts(graph: &PetGraph, facts: &AnalysisFacts, loop_node: NodeIndex) -> Vec<ReductionFact> {
        let node = graph.node(loop_node);
        if node.kind != NodeKind::Loop {
            return Vec::new();
        }

        let mut seen = FxHashSet::default();
        let mut matched = Vec::new();
        for cu in graph.cu_subtree(loop_node) {
            for var in graph.node(cu).all_vars() {
                if !seen.insert(var.name.as_str()) {
                    continue;
                }
                if let Some(fact) = facts.reduction_fact(node.start, &var.name) {
                    matched.push(fact.clone());
                }
            }
        }
        matched
    }

    /// Set `reduction` on every matching loop
    pub fn detect(&self, graph: &mut PetGraph, facts: &AnalysisFacts) -> Vec<ReductionInfo> {
        let mut result = Vec::new();
        for loop_node in graph.nodes_of_kind(NodeKind::Loop) {
            let reductions = Self::matching_facts(graph, facts, loop_node);
            if reductions.is_empty() {
                continue;
            }
            graph.node_mut(loop_node).reduction = true;
            info!(
                "Reduction at {} ({} variables)",
                graph.node(loop_node).id,
                reductions.len()
            );
            result.push(ReductionInfo {
                info: graph.pattern_info(loop_node),
                reductions,
            });
        }
        result
    }
}
