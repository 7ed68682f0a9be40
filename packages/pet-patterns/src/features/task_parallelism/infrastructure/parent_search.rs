//! Upward searches along CHILD edges

use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use crate::features::pet_graph::PetGraph;
use crate::shared::models::{EdgeKind, NodeKind};

/// Closest ancestors of `kind`, breadth-first over incoming CHILD edges
///
/// Each result pairs the ancestor with the node directly below it on the
/// path that reached it. The search does not continue past a match.
pub fn parents_of_kind(
    graph: &PetGraph,
    node: NodeIndex,
    kind: NodeKind,
    only_first: bool,
) -> Vec<(NodeIndex, NodeIndex)> {
    let mut result = Vec::new();
    let mut visited = FxHashSet::default();
    let mut queue = VecDeque::from([node]);

    while let Some(current) = queue.pop_front() {
        visited.insert(current);
        for e in graph.in_edges(current, Some(EdgeKind::Child)) {
            if visited.contains(&e.source) {
                continue;
            }
            if graph.node(e.source).kind == kind {
                if only_first {
                    return vec![(e.source, current)];
                }
                result.push((e.source, current));
                visited.insert(e.source);
            } else {
                visited.insert(e.source);
                queue.push_back(e.source);
            }
        }
    }
    result
}

/// True if `target` is `source` or lies in `source`'s CHILD subtree
pub fn reaches(graph: &PetGraph, source: NodeIndex, target: NodeIndex) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack = vec![target];
    while let Some(current) = stack.pop() {
        if current == source {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        stack.extend(graph.parents(current));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pet_graph::infrastructure::fixtures::GraphFixture;

    #[test]
    fn test_closest_function_parent() {
        let mut f = GraphFixture::new();
        let main = f.func(0, "main", 1, 30);
        let call = f.cu(1, 2, 4, 5);
        let helper = f.func(2, "helper", 10, 20);
        let body = f.cu(3, 11, 12, 5);
        f.children(main, &[call]);
        f.children(call, &[helper]);
        f.children(helper, &[body]);

        assert_eq!(parents_of_kind(&f.graph, body, NodeKind::Func, true), vec![(helper, body)]);
        assert_eq!(parents_of_kind(&f.graph, helper, NodeKind::Func, false), vec![(main, call)]);
        assert!(parents_of_kind(&f.graph, main, NodeKind::Func, false).is_empty());
    }

    #[test]
    fn test_all_loop_parents() {
        let mut f = GraphFixture::new();
        let l1 = f.lp(0, 1, 10, 5);
        let l2 = f.lp(1, 20, 30, 5);
        let cu = f.cu(2, 5, 6, 5);
        f.children(l1, &[cu]);
        f.children(l2, &[cu]);

        let parents = parents_of_kind(&f.graph, cu, NodeKind::Loop, false);
        assert_eq!(parents, vec![(l1, cu), (l2, cu)]);
    }

    #[test]
    fn test_reaches_is_reflexive_and_follows_children() {
        let mut f = GraphFixture::new();
        let main = f.func(0, "main", 1, 30);
        let a = f.cu(1, 2, 4, 5);
        let b = f.cu(2, 5, 6, 5);
        f.children(main, &[a]);

        assert!(reaches(&f.graph, main, main));
        assert!(reaches(&f.graph, main, a));
        assert!(!reaches(&f.graph, a, main));
        assert!(!reaches(&f.graph, main, b));
    }
}
