//! Task, taskwait and parallel-region suggestion synthesis

use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{debug, trace};

use super::parent_search::{parents_of_kind, reaches};
use crate::features::pet_graph::PetGraph;
use crate::features::task_parallelism::domain::{MwType, ParallelRegionInfo, RoleMap, TaskPragma, TaskSuggestion};
use crate::features::variable_classification::{PatternContext, VariableClassification, VariableClassifier};
use crate::shared::models::{AnalysisFacts, EdgeKind, NodeKind, SourcePosition};

/// Suggestion together with the node it is attached to
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedSuggestion {
    pub node: NodeIndex,
    pub suggestion: TaskSuggestion,
}

impl LocatedSuggestion {
    pub fn new(graph: &PetGraph, node: NodeIndex, pragma: TaskPragma, pragma_line: SourcePosition) -> Self {
        Self {
            node,
            suggestion: TaskSuggestion {
                info: graph.pattern_info(node),
                pragma,
                pragma_line,
                region_start_line: pragma_line.line,
                region_end_line: graph.node(node).end_line(),
                first_private: Vec::new(),
                private: Vec::new(),
                shared: Vec::new(),
            },
        }
    }

    pub fn is_taskwait(&self) -> bool {
        self.suggestion.pragma.is_taskwait()
    }
}

/// Steps shared by every task-parallelism run
pub struct SuggestionSynthesizer<'a> {
    graph: &'a PetGraph,
    facts: &'a AnalysisFacts,
    roles: &'a RoleMap,
    classifier: &'a dyn VariableClassifier,
}

impl<'a> SuggestionSynthesizer<'a> {
    pub fn new(
        graph: &'a PetGraph,
        facts: &'a AnalysisFacts,
        roles: &'a RoleMap,
        classifier: &'a dyn VariableClassifier,
    ) -> Self {
        Self {
            graph,
            facts,
            roles,
            classifier,
        }
    }

    /// Regions plus task/taskwait suggestions with their line ranges set
    pub fn synthesize(&self) -> (Vec<ParallelRegionInfo>, Vec<LocatedSuggestion>) {
        let (tasks, taskwaits) = self.initial_suggestions();
        let taskwaits = self.keep_reachable_taskwaits(&tasks, taskwaits);
        let regions = self.parallel_regions(&tasks);

        let mut suggestions = tasks;
        suggestions.extend(taskwaits);
        let mut suggestions = assign_region_lines(self.graph, suggestions);
        self.rewrite_taskloop_reductions(&mut suggestions);

        debug!(
            "task suggestions: {} regions, {} tasks, {} taskwaits",
            regions.len(),
            suggestions.iter().filter(|s| !s.is_taskwait()).count(),
            suggestions.iter().filter(|s| s.is_taskwait()).count()
        );
        (regions, suggestions)
    }

    /// Taskwaits before barriers and tasks at recursive calls inside workers
    ///
    /// Returns `(tasks, taskwaits)`, each grouped by the line they are keyed on.
    pub fn initial_suggestions(&self) -> (Vec<LocatedSuggestion>, Vec<LocatedSuggestion>) {
        let mut grouped: Vec<(SourcePosition, Vec<LocatedSuggestion>)> = Vec::new();
        let mut push = |key: SourcePosition, s: LocatedSuggestion| match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(s),
            None => grouped.push((key, vec![s])),
        };

        for barrier in self.roles.nodes_with(self.graph, MwType::Barrier) {
            let line = self.first_dependency_line(barrier);
            let key = self.graph.node(barrier).start;
            push(key, LocatedSuggestion::new(self.graph, barrier, TaskPragma::Taskwait, line));
        }

        let mut workers = self.roles.nodes_with(self.graph, MwType::Worker);
        workers.extend(self.roles.nodes_with(self.graph, MwType::BarrierWorker));

        for vx in self.graph.node_indices() {
            for call in &self.graph.node(vx).recursive_calls {
                let Some(worker) = workers
                    .iter()
                    .copied()
                    .find(|&w| self.graph.node(w).contains_position(call.position))
                else {
                    continue;
                };
                if !matches!(self.graph.node(worker).kind, NodeKind::Func | NodeKind::Cu) {
                    continue;
                }
                trace!(
                    "recursive call {} at {} inside worker {}",
                    call.function_name,
                    call.position,
                    self.graph.node(worker).id
                );
                let vars = self
                    .classifier
                    .classify(self.graph, self.facts, worker, PatternContext::Task, &[], &[]);
                let mut s = LocatedSuggestion::new(self.graph, vx, TaskPragma::Task, call.position);
                s.suggestion.first_private = VariableClassification::names(&vars.first_private);
                s.suggestion.private = VariableClassification::names(&vars.private);
                s.suggestion.shared = VariableClassification::names(&vars.shared);
                push(call.position, s);
            }
        }

        grouped
            .into_iter()
            .flat_map(|(_, group)| group)
            .partition(|s| !s.is_taskwait())
    }

    /// Earliest dependency sink of `node`, or its end if none comes earlier
    fn first_dependency_line(&self, node: NodeIndex) -> SourcePosition {
        let mut first = self.graph.node(node).end;
        for e in self.graph.out_edges(node, Some(EdgeKind::Data)) {
            if let Some(d) = e.dependency.as_data() {
                if d.sink.line < first.line {
                    first = d.sink;
                }
            }
        }
        first
    }

    /// Drop taskwaits outside every function body holding an earlier task
    pub fn keep_reachable_taskwaits(
        &self,
        tasks: &[LocatedSuggestion],
        taskwaits: Vec<LocatedSuggestion>,
    ) -> Vec<LocatedSuggestion> {
        let mut bodies: Vec<(NodeIndex, Vec<u32>)> = Vec::new();
        for t in tasks {
            let Some(&(func, _)) = parents_of_kind(self.graph, t.node, NodeKind::Func, true).first() else {
                continue;
            };
            let line = t.suggestion.pragma_line.line;
            match bodies.iter_mut().find(|(f, _)| *f == func) {
                Some((_, lines)) => lines.push(line),
                None => bodies.push((func, vec![line])),
            }
        }

        taskwaits
            .into_iter()
            .filter(|tw| {
                let line = tw.suggestion.pragma_line.line;
                bodies
                    .iter()
                    .any(|(func, lines)| reaches(self.graph, *func, tw.node) && lines.iter().any(|&l| l <= line))
            })
            .collect()
    }

    /// One region per outermost FUNC above a task suggestion
    pub fn parallel_regions(&self, tasks: &[LocatedSuggestion]) -> Vec<ParallelRegionInfo> {
        let mut worklist: VecDeque<(NodeIndex, NodeIndex)> = VecDeque::new();
        for t in tasks {
            for entry in parents_of_kind(self.graph, t.node, NodeKind::Func, false) {
                if !worklist.contains(&entry) {
                    worklist.push_back(entry);
                }
            }
        }

        let mut seen: FxHashSet<(NodeIndex, NodeIndex)> = worklist.iter().copied().collect();
        let mut outermost: Vec<(NodeIndex, NodeIndex)> = Vec::new();
        while let Some((func, last)) = worklist.pop_front() {
            let above = parents_of_kind(self.graph, func, NodeKind::Func, false);
            if above.is_empty() {
                if !outermost.contains(&(func, last)) {
                    outermost.push((func, last));
                }
                continue;
            }
            for entry in above {
                if seen.insert(entry) {
                    worklist.push_back(entry);
                }
            }
        }

        outermost
            .into_iter()
            .map(|(func, last)| {
                let last = self.graph.node(last);
                ParallelRegionInfo {
                    info: self.graph.pattern_info(func),
                    region_start_line: last.start,
                    region_end_line: last.end,
                }
            })
            .collect()
    }

    /// Turn tasks inside a reduction loop into `taskloop reduction` directives
    pub fn rewrite_taskloop_reductions(&self, suggestions: &mut [LocatedSuggestion]) {
        for s in suggestions.iter_mut() {
            if s.suggestion.pragma != TaskPragma::Task {
                continue;
            }
            let task = self.graph.node(s.node);
            let loops = parents_of_kind(self.graph, s.node, NodeKind::Loop, false);
            let fact = loops
                .iter()
                .map(|&(l, _)| self.graph.node(l))
                .filter(|l| l.start_line() <= task.start_line() && l.end_line() >= task.end_line())
                .filter(|l| l.reduction)
                .find_map(|l| self.facts.reduction_facts_for(l.start).next());
            if let Some(fact) = fact {
                debug!("task at {} rewritten to taskloop reduction", s.suggestion.pragma_line);
                s.suggestion.pragma = TaskPragma::TaskloopReduction {
                    operation: fact.operation.clone(),
                    variable: fact.clause_name(),
                };
            }
        }
    }
}

/// Split each node's range among its suggestions by start line
///
/// Groups keep the order in which their node first appears; each group is
/// stable-sorted by start line. A region never ends before it starts.
pub fn assign_region_lines(graph: &PetGraph, suggestions: Vec<LocatedSuggestion>) -> Vec<LocatedSuggestion> {
    let mut groups: Vec<(NodeIndex, Vec<LocatedSuggestion>)> = Vec::new();
    for s in suggestions {
        match groups.iter_mut().find(|(n, _)| *n == s.node) {
            Some((_, group)) => group.push(s),
            None => groups.push((s.node, vec![s])),
        }
    }

    let mut result = Vec::new();
    for (node, mut group) in groups {
        group.sort_by_key(|s| s.suggestion.region_start_line);
        let node_end = graph.node(node).end_line();
        let starts: Vec<u32> = group.iter().map(|s| s.suggestion.region_start_line).collect();
        for (i, s) in group.iter_mut().enumerate() {
            let end = match starts.get(i + 1) {
                Some(next) => next.saturating_sub(1),
                None => node_end,
            };
            s.suggestion.region_end_line = end.max(s.suggestion.region_start_line);
        }
        result.extend(group);
    }
    result
}
