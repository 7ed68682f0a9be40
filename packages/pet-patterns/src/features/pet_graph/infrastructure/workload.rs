//! Instruction-count based workload estimates

use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashSet;

use super::graph::PetGraph;
use crate::shared::models::{NodeKind, PatternInfo};

impl PetGraph {
    /// Common record header for a pattern found at `node`
    pub fn pattern_info(&self, node: NodeIndex) -> PatternInfo {
        let n = self.node(node);
        PatternInfo {
            node_id: n.id,
            start_line: n.start,
            end_line: n.end,
            instructions_count: self.total_instructions_count(node),
            workload: self.calculate_workload(node),
        }
    }

    /// Sum of instruction counts over the CU-subtree of `node`
    pub fn total_instructions_count(&self, node: NodeIndex) -> u64 {
        self.cu_subtree(node)
            .into_iter()
            .map(|cu| self.node(cu).instructions_count)
            .sum()
    }

    /// Estimated dynamic workload of `node`
    ///
    /// Loop bodies are scaled by the loop's iteration count (at least 1).
    /// A CHILD subtree shared by several parents is counted once, on the
    /// first path that reaches it.
    pub fn calculate_workload(&self, node: NodeIndex) -> u64 {
        let mut visited = FxHashSet::default();
        self.workload_inner(node, &mut visited)
    }

    fn workload_inner(&self, node: NodeIndex, visited: &mut FxHashSet<NodeIndex>) -> u64 {
        if !visited.insert(node) {
            return 0;
        }
        let n = self.node(node);
        if n.kind == NodeKind::Dummy {
            return 0;
        }
        let children = self
            .children(node)
            .into_iter()
            .fold(0u64, |acc, c| acc.saturating_add(self.workload_inner(c, visited)));
        match n.kind {
            NodeKind::Dummy => 0,
            NodeKind::Cu => n.instructions_count.saturating_add(children),
            NodeKind::Func => children,
            NodeKind::Loop => {
                let iterations = u64::try_from(n.loop_iterations.max(1)).unwrap_or(1);
                children.saturating_mul(iterations)
            }
        }
    }
}
