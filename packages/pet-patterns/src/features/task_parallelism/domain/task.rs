//! Task-tree nodes

use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::role::MwType;
use crate::features::pet_graph::PetGraph;
use crate::shared::models::{NodeId, SourcePosition};

/// One task of a fork's task tree
///
/// Owns the graph nodes it was built from; merging moves nodes and child
/// tasks between tasks, never copies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub node_id: NodeId,
    pub nodes: Vec<NodeId>,
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub role: MwType,
    pub instructions_count: u64,
    pub workload: u64,
    pub child_tasks: Vec<Task>,
}

impl Task {
    pub fn new(graph: &PetGraph, idx: NodeIndex, role: MwType) -> Self {
        let node = graph.node(idx);
        Self {
            node_id: node.id,
            nodes: vec![node.id],
            start: node.start,
            end: node.end,
            role,
            instructions_count: graph.total_instructions_count(idx),
            workload: graph.calculate_workload(idx),
            child_tasks: Vec::new(),
        }
    }

    /// Append `other` (a following sibling) to this task
    pub fn aggregate(&mut self, other: Task) {
        self.nodes.extend(other.nodes);
        self.end = other.end;
        self.workload = self.workload.saturating_add(other.workload);
        self.instructions_count = self.instructions_count.saturating_add(other.instructions_count);
        self.role = if self.role == MwType::BarrierWorker || other.role == MwType::BarrierWorker {
            MwType::BarrierWorker
        } else {
            MwType::Worker
        };
        self.child_tasks.extend(other.child_tasks);
    }

    /// Number of tasks in this tree, self included
    pub fn size(&self) -> usize {
        1 + self.child_tasks.iter().map(Task::size).sum::<usize>()
    }
}
