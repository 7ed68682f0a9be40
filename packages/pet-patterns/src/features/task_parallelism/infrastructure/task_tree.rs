//! Task-tree construction from the entry function

use petgraph::stable_graph::NodeIndex;
use tracing::debug;

use crate::features::pet_graph::PetGraph;
use crate::features::task_parallelism::domain::{MwType, RoleMap, Task};
use crate::shared::constants::FORK_SENTINEL_LINE;
use crate::shared::models::NodeKind;

/// Builds one task tree per fork reachable from the entry node
#[derive(Debug, Clone, Copy)]
pub struct TaskTreeBuilder {
    fork_sentinel_line: u32,
}

impl Default for TaskTreeBuilder {
    fn default() -> Self {
        Self::new(FORK_SENTINEL_LINE)
    }
}

impl TaskTreeBuilder {
    /// Forks starting on `fork_sentinel_line` do not open a tree
    pub fn new(fork_sentinel_line: u32) -> Self {
        Self { fork_sentinel_line }
    }

    /// Task trees in pre-order, the entry node's tree first
    pub fn build(&self, graph: &PetGraph, roles: &RoleMap, entry: NodeIndex) -> Vec<Task> {
        let mut forks = Vec::new();
        let mut root = Task::new(graph, entry, roles.get(entry));
        let mut path = Vec::new();
        self.expand(graph, roles, entry, &mut root, &mut forks, &mut path);
        forks.insert(0, root);

        debug!(
            "built {} task trees ({} tasks)",
            forks.len(),
            forks.iter().map(Task::size).sum::<usize>()
        );
        forks
    }

    fn expand(
        &self,
        graph: &PetGraph,
        roles: &RoleMap,
        node: NodeIndex,
        parent: &mut Task,
        forks: &mut Vec<Task>,
        path: &mut Vec<NodeIndex>,
    ) {
        let is_func = graph.node(node).kind == NodeKind::Func;
        if is_func {
            if path.contains(&node) {
                return;
            }
            path.push(node);
        }

        for child in graph.children(node) {
            let role = roles.get(child);
            if role.is_task() {
                let mut task = Task::new(graph, child, role);
                self.expand(graph, roles, child, &mut task, forks, path);
                parent.child_tasks.push(task);
            } else if role == MwType::Fork && graph.node(child).start_line() != self.fork_sentinel_line {
                let slot = forks.len();
                let mut fork = Task::new(graph, child, role);
                self.expand(graph, roles, child, &mut fork, forks, path);
                forks.insert(slot, fork);
            } else {
                self.expand(graph, roles, child, parent, forks, path);
            }
        }

        if is_func {
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pet_graph::infrastructure::fixtures::GraphFixture;
    use crate::features::task_parallelism::infrastructure::RoleClassifier;

    #[test]
    fn test_workers_become_child_tasks() {
        let mut f = GraphFixture::new();
        let main = f.func(0, "main", 1, 10);
        let a = f.cu(1, 2, 3, 5);
        let b = f.cu(2, 4, 5, 7);
        f.children(main, &[a, b]);
        f.raw(b, a, "x", 4, 2);

        let roles = RoleClassifier::new().classify(&f.graph);
        let forks = TaskTreeBuilder::default().build(&f.graph, &roles, main);

        // main, then the fork `a`
        assert_eq!(forks.len(), 2);
        assert_eq!(forks[0].node_id, f.graph.node(main).id);
        assert_eq!(forks[0].child_tasks.len(), 1);
        assert_eq!(forks[0].child_tasks[0].node_id, f.graph.node(b).id);
        assert_eq!(forks[0].child_tasks[0].role, MwType::Worker);
        assert_eq!(forks[1].node_id, f.graph.node(a).id);
    }

    #[test]
    fn test_sentinel_fork_does_not_open_tree() {
        let mut f = GraphFixture::new();
        let main = f.func(0, "main", 1, 10);
        let a = f.cu(1, FORK_SENTINEL_LINE, FORK_SENTINEL_LINE, 5);
        f.children(main, &[a]);

        let roles = RoleClassifier::new().classify(&f.graph);
        let forks = TaskTreeBuilder::default().build(&f.graph, &roles, main);
        assert_eq!(forks.len(), 1);
    }

    #[test]
    fn test_nested_forks_are_in_pre_order() {
        let mut f = GraphFixture::new();
        let main = f.func(0, "main", 1, 20);
        let outer = f.cu(1, 2, 10, 5);
        let inner = f.cu(2, 3, 4, 5);
        f.children(main, &[outer]);
        f.children(outer, &[inner]);

        let roles = RoleClassifier::new().classify(&f.graph);
        let forks = TaskTreeBuilder::default().build(&f.graph, &roles, main);
        let ids: Vec<_> = forks.iter().map(|t| t.node_id).collect();
        assert_eq!(
            ids,
            vec![f.graph.node(main).id, f.graph.node(outer).id, f.graph.node(inner).id]
        );
    }

    #[test]
    fn test_shared_function_is_expanded_per_path() {
        let mut f = GraphFixture::new();
        let main = f.func(0, "main", 1, 20);
        let helper = f.func(1, "helper", 30, 40);
        let a = f.cu(2, 2, 3, 5);
        let b = f.cu(3, 4, 5, 5);
        let body = f.cu(4, 31, 32, 5);
        f.children(main, &[a, b]);
        f.children(a, &[helper]);
        f.children(b, &[helper]);
        f.children(helper, &[body]);
        f.raw(b, a, "x", 4, 2);

        let roles = RoleClassifier::new().classify(&f.graph);
        let forks = TaskTreeBuilder::default().build(&f.graph, &roles, main);
        let total: usize = forks.iter().map(Task::size).sum();
        // helper's fork reached twice, once below `a` and once below worker `b`
        assert!(total >= 4);
        assert_eq!(forks[0].node_id, f.graph.node(main).id);
    }
}
