//! Inner-loop iteration counts relative to their enclosing loop

use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::features::pet_graph::PetGraph;
use crate::shared::models::{AnalysisFacts, NodeKind};

/// Per-run memo of relative iteration counts
#[derive(Debug, Default)]
pub struct LoopIterationCache {
    counts: FxHashMap<NodeIndex, u64>,
}

impl LoopIterationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterations of `loop_node` per iteration of its enclosing loop
    pub fn iterations_count(&mut self, graph: &PetGraph, facts: &AnalysisFacts, loop_node: NodeIndex) -> u64 {
        if let Some(&count) = self.counts.get(&loop_node) {
            return count;
        }

        let own = facts.loop_iterations.get(graph.node(loop_node).start);
        let parent = parent_iterations(graph, facts, loop_node);
        let count = if own < parent {
            own
        } else if own == 0 || parent == 0 {
            0
        } else {
            own / parent
        };

        self.counts.insert(loop_node, count);
        count
    }
}

/// Iteration count of the nearest enclosing loop (first CHILD parent chain),
/// at least 1; 1 when there is none
fn parent_iterations(graph: &PetGraph, facts: &AnalysisFacts, node: NodeIndex) -> u64 {
    let mut current = node;
    let mut steps = 0usize;
    while let Some(&parent) = graph.parents(current).first() {
        if graph.node(parent).kind == NodeKind::Loop {
            return facts.loop_iterations.get(graph.node(parent).start).max(1);
        }
        current = parent;
        steps += 1;
        if steps > graph.node_count() {
            break;
        }
    }
    1
}

/// Direct LOOP children plus loops directly under direct FUNC children
pub fn inner_loops(graph: &PetGraph, root: NodeIndex) -> Vec<NodeIndex> {
    let mut loops = graph.direct_children_of_kind(root, NodeKind::Loop);
    for func in graph.direct_children_of_kind(root, NodeKind::Func) {
        loops.extend(graph.direct_children_of_kind(func, NodeKind::Loop));
    }
    loops
}

/// Smallest relative iteration count of the inner loops
///
/// `None` when there are no inner loops or any of them has 0 iterations.
pub fn chunk_limit(
    graph: &PetGraph,
    facts: &AnalysisFacts,
    cache: &mut LoopIterationCache,
    root: NodeIndex,
) -> Option<u64> {
    inner_loops(graph, root)
        .into_iter()
        .map(|l| cache.iterations_count(graph, facts, l))
        .min()
        .filter(|&min| min > 0)
}
