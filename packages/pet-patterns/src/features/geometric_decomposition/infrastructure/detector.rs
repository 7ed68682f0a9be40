use petgraph::stable_graph::NodeIndex;
use tracing::{debug, info};

use super::chunk_limit::{chunk_limit, LoopIterationCache};
use crate::features::geometric_decomposition::domain::GdInfo;
use crate::features::pet_graph::PetGraph;
use crate::features::variable_classification::{PatternContext, VariableClassifier};
use crate::shared::constants::GEOMETRIC_DECOMPOSITION_PRAGMA;
use crate::shared::models::{AnalysisFacts, NodeKind, Variable};

/// Task-count heuristic for a chunked loop nest
///
/// `nt = 1.1*sqrt(m) + 0.0002*sqrt(w) - 0.0000002*sqrt(m)*sqrt(w) - 10`,
/// rounded down to hundreds above 1000, to tens above 100, and clamped to 2
/// when negative.
pub fn estimate_num_tasks(min_iter: u64, workload: u64) -> u64 {
    let mi = (min_iter as f64).sqrt();
    let wl = (workload as f64).sqrt();
    let nt = 1.1 * mi + 0.0002 * wl - 0.0000002 * mi * wl - 10.0;

    if nt >= 1000.0 {
        ((nt / 100.0).floor() * 100.0) as u64
    } else if nt >= 100.0 {
        ((nt / 10.0).floor() * 10.0) as u64
    } else if nt < 0.0 {
        2
    } else {
        nt.floor() as u64
    }
}

/// Flags loop nests whose loops are all do-all or reduction
///
/// Runs after reduction and do-all detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricDecompositionDetector;

impl GeometricDecompositionDetector {
    pub fn new() -> Self {
        Self
    }

    /// Every loop of the nest (root included), and every loop directly under
    /// a direct FUNC child, is already parallel
    pub fn qualifies(graph: &PetGraph, root: NodeIndex) -> bool {
        let parallel = |l: NodeIndex| {
            let n = graph.node(l);
            n.do_all || n.reduction
        };

        if !graph
            .subtree_of_kind(root, Some(NodeKind::Loop))
            .into_iter()
            .all(parallel)
        {
            return false;
        }
        graph
            .direct_children_of_kind(root, NodeKind::Func)
            .into_iter()
            .flat_map(|f| graph.direct_children_of_kind(f, NodeKind::Loop))
            .all(parallel)
    }

    pub fn detect(
        &self,
        graph: &mut PetGraph,
        facts: &AnalysisFacts,
        classifier: &dyn VariableClassifier,
    ) -> Vec<GdInfo> {
        let mut cache = LoopIterationCache::new();
        let mut result = Vec::new();

        for root in graph.nodes_of_kind(NodeKind::Loop) {
            if !Self::qualifies(graph, root) {
                continue;
            }
            let Some(min_iter) = chunk_limit(graph, facts, &mut cache, root) else {
                debug!("{} fails chunk limit", graph.node(root).id);
                continue;
            };

            graph.node_mut(root).geometric_decomposition = true;
            let gd = self.build_info(graph, facts, classifier, root, min_iter);
            info!(
                "Geometric decomposition at {} (min_iter {}, {} tasks)",
                gd.info.node_id, gd.min_iter, gd.num_tasks
            );
            result.push(gd);
        }
        result
    }

    fn build_info(
        &self,
        graph: &PetGraph,
        facts: &AnalysisFacts,
        classifier: &dyn VariableClassifier,
        root: NodeIndex,
        min_iter: u64,
    ) -> GdInfo {
        let info = graph.pattern_info(root);

        let mut child_loops: Vec<NodeIndex> = graph
            .subtree_of_kind(root, Some(NodeKind::Loop))
            .into_iter()
            .filter(|&l| l != root)
            .collect();
        for func in graph.direct_children_of_kind(root, NodeKind::Func) {
            child_loops.extend(graph.direct_children_of_kind(func, NodeKind::Loop));
        }

        let mut do_all_children = Vec::new();
        let mut reduction_children = Vec::new();
        for l in child_loops {
            let n = graph.node(l);
            if n.do_all {
                do_all_children.push(n.id);
            } else if n.reduction {
                reduction_children.push(n.id);
            }
        }

        let mut variables =
            classifier.classify(graph, facts, root, PatternContext::GeometricDecomposition, &[], &[]);
        variables.first_private.push(Variable::new("int", "i"));

        GdInfo {
            num_tasks: estimate_num_tasks(min_iter, info.workload),
            info,
            do_all_children,
            reduction_children,
            min_iter,
            pragma: GEOMETRIC_DECOMPOSITION_PRAGMA.to_string(),
            variables,
        }
    }
}
