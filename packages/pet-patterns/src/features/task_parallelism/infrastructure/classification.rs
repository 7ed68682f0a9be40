//! Fork/worker/barrier classification
//!
//! Every non-dummy node with children marks its children as forks, then
//! promotes children that depend on siblings to workers and barriers.
//! Barriers with no data dependence between them become barrier-workers.

use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::features::pet_graph::PetGraph;
use crate::features::task_parallelism::domain::{MwType, RoleMap};
use crate::shared::models::{DepType, EdgeKind, NodeKind};

/// Assigns [`MwType`] roles over the whole graph
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleClassifier;

impl RoleClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, graph: &PetGraph) -> RoleMap {
        let mut roles = RoleMap::new();

        for node in graph.node_indices() {
            if graph.node(node).kind == NodeKind::Dummy {
                continue;
            }
            if graph.has_children(node) {
                classify_children(graph, node, &mut roles);
            }
            if roles.get(node) == MwType::None {
                roles.set(node, MwType::Root);
            }
        }

        debug!(
            "roles: {} forks, {} workers, {} barriers, {} barrier-workers",
            roles.nodes_with(graph, MwType::Fork).len(),
            roles.nodes_with(graph, MwType::Worker).len(),
            roles.nodes_with(graph, MwType::Barrier).len(),
            roles.nodes_with(graph, MwType::BarrierWorker).len(),
        );
        roles
    }
}

fn classify_children(graph: &PetGraph, node: NodeIndex, roles: &mut RoleMap) {
    let mut children = graph.children(node);
    dedup_in_order(&mut children);

    for &child in &children {
        if matches!(roles.get(child), MwType::None | MwType::Root) {
            roles.set(child, MwType::Fork);
        }

        for &other in &children {
            if other == child || !graph.depends(other, child) {
                continue;
            }
            match roles.get(other) {
                MwType::Worker => roles.set(other, MwType::Barrier),
                MwType::Barrier | MwType::BarrierWorker => {}
                MwType::None | MwType::Root | MwType::Fork => {
                    roles.set(other, MwType::Worker);
                    if direct_raw_edges(graph, other, child) >= 2 {
                        roles.set(other, MwType::Barrier);
                    }
                }
            }
        }
    }

    let barriers: Vec<NodeIndex> = children
        .iter()
        .copied()
        .filter(|&c| roles.get(c) == MwType::Barrier)
        .collect();
    for (i, &a) in barriers.iter().enumerate() {
        for &b in &barriers[i + 1..] {
            if !data_linked(graph, a, b) {
                roles.set(a, MwType::BarrierWorker);
                roles.set(b, MwType::BarrierWorker);
            }
        }
    }
}

fn dedup_in_order(nodes: &mut Vec<NodeIndex>) {
    let mut seen = FxHashSet::default();
    nodes.retain(|n| seen.insert(*n));
}

fn direct_raw_edges(graph: &PetGraph, source: NodeIndex, target: NodeIndex) -> usize {
    graph
        .out_edges(source, Some(EdgeKind::Data))
        .into_iter()
        .filter(|e| e.target == target && e.dependency.data_of(DepType::Raw, None).is_some())
        .count()
}

fn data_linked(graph: &PetGraph, a: NodeIndex, b: NodeIndex) -> bool {
    graph
        .out_edges(a, Some(EdgeKind::Data))
        .iter()
        .any(|e| e.target == b)
        || graph
            .out_edges(b, Some(EdgeKind::Data))
            .iter()
            .any(|e| e.target == a)
}
