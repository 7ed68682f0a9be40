//! Fork/worker/barrier roles

use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::features::pet_graph::PetGraph;
use crate::shared::models::NodeId;

/// Role of a node in task parallelism
///
/// Transitions: NONE -> ROOT (never classified), NONE/ROOT -> FORK,
/// NONE/ROOT/FORK -> WORKER -> BARRIER -> BARRIER_WORKER.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MwType {
    #[default]
    None,
    Root,
    Fork,
    Worker,
    Barrier,
    BarrierWorker,
}

impl MwType {
    /// Roles that open a task of their own
    pub fn is_task(&self) -> bool {
        matches!(self, MwType::Worker | MwType::Barrier | MwType::BarrierWorker)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MwType::None => "NONE",
            MwType::Root => "ROOT",
            MwType::Fork => "FORK",
            MwType::Worker => "WORKER",
            MwType::Barrier => "BARRIER",
            MwType::BarrierWorker => "BARRIER_WORKER",
        }
    }
}

/// Roles of one analysis run, kept outside the graph
#[derive(Debug, Clone, Default)]
pub struct RoleMap {
    roles: FxHashMap<NodeIndex, MwType>,
}

impl RoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, idx: NodeIndex) -> MwType {
        self.roles.get(&idx).copied().unwrap_or_default()
    }

    pub fn set(&mut self, idx: NodeIndex, role: MwType) {
        self.roles.insert(idx, role);
    }

    /// Nodes holding `role`, in graph order
    pub fn nodes_with(&self, graph: &PetGraph, role: MwType) -> Vec<NodeIndex> {
        graph
            .node_indices()
            .into_iter()
            .filter(|&idx| self.get(idx) == role)
            .collect()
    }

    /// Non-default roles keyed by node id
    pub fn by_id(&self, graph: &PetGraph) -> BTreeMap<NodeId, MwType> {
        self.roles
            .iter()
            .filter(|(_, role)| **role != MwType::None)
            .map(|(&idx, &role)| (graph.node(idx).id, role))
            .collect()
    }
}
