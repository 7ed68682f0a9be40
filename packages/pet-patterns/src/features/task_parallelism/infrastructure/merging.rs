//! Task-tree merging
//!
//! Light child tasks are folded into a neighbouring sibling (or into their
//! parent), and parents with too few children give up their heaviest one.

use tracing::trace;

use crate::features::task_parallelism::domain::Task;
use crate::shared::constants::{DEFAULT_MIN_PARALLELISM, DEFAULT_NEIGHBOUR_LINE_GAP, DEFAULT_WORKLOAD_THRESHOLD};

#[derive(Debug, Clone, Copy)]
pub struct TaskMerger {
    workload_threshold: u64,
    min_parallelism: usize,
    neighbour_gap: u32,
}

impl Default for TaskMerger {
    fn default() -> Self {
        Self::new(DEFAULT_WORKLOAD_THRESHOLD, DEFAULT_MIN_PARALLELISM, DEFAULT_NEIGHBOUR_LINE_GAP)
    }
}

impl TaskMerger {
    pub fn new(workload_threshold: u64, min_parallelism: usize, neighbour_gap: u32) -> Self {
        Self {
            workload_threshold,
            min_parallelism,
            neighbour_gap,
        }
    }

    /// `second` starts on `first`'s last line or at most `gap` lines later
    pub fn neighbours(&self, first: &Task, second: &Task) -> bool {
        let end = first.end.line;
        second.start.line >= end && second.start.line <= end.saturating_add(self.neighbour_gap)
    }

    /// Merge `task`'s subtree in place
    ///
    /// Every step removes one task from the tree, so the loop ends.
    pub fn merge(&self, task: &mut Task) {
        loop {
            if let Some(i) = self.first_light_child(task) {
                self.fold_light_child(task, i);
                continue;
            }
            let n = task.child_tasks.len();
            if n > 0 && n < self.min_parallelism {
                hoist_heaviest(task);
                continue;
            }
            break;
        }

        for child in &mut task.child_tasks {
            self.merge(child);
        }
    }

    fn first_light_child(&self, task: &Task) -> Option<usize> {
        task.child_tasks
            .iter()
            .position(|c| c.workload < self.workload_threshold)
    }

    fn fold_light_child(&self, task: &mut Task, i: usize) {
        let children = &mut task.child_tasks;
        if i > 0 && self.neighbours(&children[i - 1], &children[i]) {
            let child = children.remove(i);
            trace!("merging {} into predecessor {}", child.node_id, children[i - 1].node_id);
            children[i - 1].aggregate(child);
        } else if i + 1 < children.len() && self.neighbours(&children[i], &children[i + 1]) {
            let succ = children.remove(i + 1);
            trace!("merging successor {} into {}", succ.node_id, children[i].node_id);
            children[i].aggregate(succ);
        } else {
            let child = task.child_tasks.remove(i);
            trace!("folding {} into parent {}", child.node_id, task.node_id);
            absorb(task, child, i);
        }
    }
}

fn hoist_heaviest(task: &mut Task) {
    let mut heaviest = 0;
    for (i, c) in task.child_tasks.iter().enumerate() {
        if c.workload > task.child_tasks[heaviest].workload {
            heaviest = i;
        }
    }
    let child = task.child_tasks.remove(heaviest);
    trace!("hoisting children of {} into {}", child.node_id, task.node_id);
    absorb(task, child, heaviest);
}

/// Move `child`'s nodes into `parent` and splice its children at `at`
fn absorb(parent: &mut Task, child: Task, at: usize) {
    parent.nodes.extend(child.nodes);
    parent.child_tasks.splice(at..at, child.child_tasks);
}
