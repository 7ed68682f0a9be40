//! Barrier inference over dependencies on task nodes
//!
//! Repeats full scans until nothing changes: nodes depending on exactly one
//! task are omittable, nodes depending on tasks get a taskwait unless an
//! existing child barrier already covers those tasks.

use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use super::suggestions::LocatedSuggestion;
use crate::errors::{PatternError, Result};
use crate::features::pet_graph::PetGraph;
use crate::features::task_parallelism::domain::TaskPragma;
use crate::shared::constants::DEFAULT_MAX_FIXPOINT_ITERATIONS;
use crate::shared::models::EdgeKind;

/// Output of [`BarrierFixpoint::run`]
#[derive(Debug, Clone, Default)]
pub struct FixpointOutcome {
    pub suggestions: Vec<LocatedSuggestion>,
    /// Omittable nodes in the order they were found
    pub omittable: Vec<NodeIndex>,
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct BarrierFixpoint {
    max_iterations: usize,
}

impl Default for BarrierFixpoint {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FIXPOINT_ITERATIONS)
    }
}

impl BarrierFixpoint {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// Extend `suggestions` with inferred taskwaits
    ///
    /// Fails with [`PatternError::FixpointNotConverged`] once more than
    /// `max_iterations` scans were needed.
    pub fn run(&self, graph: &PetGraph, mut suggestions: Vec<LocatedSuggestion>) -> Result<FixpointOutcome> {
        let task_nodes: FxHashSet<NodeIndex> = suggestions
            .iter()
            .filter(|s| !s.is_taskwait())
            .map(|s| s.node)
            .collect();
        let mut barrier_nodes: FxHashSet<NodeIndex> = suggestions
            .iter()
            .filter(|s| s.is_taskwait())
            .map(|s| s.node)
            .collect();
        let mut omittable: Vec<NodeIndex> = Vec::new();
        let mut omittable_set: FxHashSet<NodeIndex> = FxHashSet::default();

        let nodes = graph.node_indices();
        let mut iterations = 0;
        let mut changed = true;
        while changed {
            changed = false;
            iterations += 1;
            if iterations > self.max_iterations {
                warn!("barrier inference did not converge after {} scans", self.max_iterations);
                return Err(PatternError::FixpointNotConverged {
                    iterations: self.max_iterations,
                });
            }

            for &v in &nodes {
                let targets: Vec<NodeIndex> = graph
                    .out_edges(v, Some(EdgeKind::Data))
                    .into_iter()
                    .map(|e| e.target)
                    .collect();
                let task_count = targets.iter().filter(|t| task_nodes.contains(t)).count();
                let barrier_count = targets
                    .iter()
                    .filter(|t| !task_nodes.contains(t) && barrier_nodes.contains(t))
                    .count();

                let needs_taskwait = if task_count == 1 && barrier_count == 0 {
                    if omittable_set.insert(v) {
                        omittable.push(v);
                        changed = true;
                    }
                    false
                } else if task_count > 0 && barrier_count > 0 {
                    let child_tasks: Vec<NodeIndex> =
                        targets.iter().copied().filter(|t| task_nodes.contains(t)).collect();
                    let child_barriers: Vec<NodeIndex> =
                        targets.iter().copied().filter(|t| barrier_nodes.contains(t)).collect();
                    !covered(graph, &child_barriers, &child_tasks)
                } else {
                    task_count > 0
                };

                if needs_taskwait && barrier_nodes.insert(v) {
                    debug!("taskwait inferred at {}", graph.node(v).id);
                    let line = graph.node(v).start;
                    suggestions.push(LocatedSuggestion::new(graph, v, TaskPragma::Taskwait, line));
                    changed = true;
                }
            }
        }

        debug!(
            "barrier inference converged after {} scans ({} omittable)",
            iterations,
            omittable.len()
        );
        Ok(FixpointOutcome {
            suggestions,
            omittable,
            iterations,
        })
    }
}

/// Some barrier's line range contains the range of every task
fn covered(graph: &PetGraph, barriers: &[NodeIndex], tasks: &[NodeIndex]) -> bool {
    barriers.iter().any(|&b| {
        let b = graph.node(b);
        tasks.iter().all(|&t| {
            let t = graph.node(t);
            b.start_line() <= t.start_line() && b.end_line() >= t.end_line()
        })
    })
}
