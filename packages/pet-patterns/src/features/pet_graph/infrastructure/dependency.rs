//! Dependency analysis over the PET
//!
//! The loop-index and read-only heuristics rely on the upstream convention
//! that the in-loop occurrence is the `sink` of WAR/WAW records and the
//! `source` of RAW records. Positions are compared as recorded.

use petgraph::stable_graph::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::graph::PetGraph;
use crate::shared::models::{DepType, EdgeKind, NodeKind, SourcePosition};

/// Precomputed view of one loop nest, shared by all queries against it
#[derive(Debug, Clone)]
pub struct LoopScope {
    pub root: NodeIndex,
    loop_starts: FxHashSet<SourcePosition>,
    cus: Vec<NodeIndex>,
    cu_set: FxHashSet<NodeIndex>,
}

impl LoopScope {
    pub fn new(graph: &PetGraph, root: NodeIndex) -> Self {
        let loop_starts = graph
            .subtree_of_kind(root, Some(NodeKind::Loop))
            .into_iter()
            .map(|l| graph.node(l).start)
            .collect();
        let cus = graph.cu_subtree(root);
        let cu_set = cus.iter().copied().collect();
        Self {
            root,
            loop_starts,
            cus,
            cu_set,
        }
    }

    pub fn is_loop_start(&self, pos: SourcePosition) -> bool {
        self.loop_starts.contains(&pos)
    }

    /// CUs of the nest, pre-order
    pub fn cus(&self) -> &[NodeIndex] {
        &self.cus
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.cu_set.contains(&idx)
    }
}

impl PetGraph {
    pub fn loop_scope(&self, root: NodeIndex) -> LoopScope {
        LoopScope::new(self, root)
    }

    /// True if `var` is the induction variable of a loop in `scope`
    ///
    /// Detected as a RAW self-dependency in a loop header whose target CU is
    /// itself part of the nest.
    pub fn is_loop_index(&self, var: &str, scope: &LoopScope) -> bool {
        scope.cus.iter().any(|&cu| {
            self.out_edges(cu, Some(EdgeKind::Data)).into_iter().any(|e| {
                e.dependency.data_of(DepType::Raw, Some(var)).map_or(false, |d| {
                    d.sink == d.source && scope.is_loop_start(d.source) && scope.contains(e.target)
                })
            })
        })
    }

    /// True unless `var` is written somewhere outside the loop headers
    pub fn is_readonly_inside_loop_body(&self, var: &str, scope: &LoopScope) -> bool {
        for &cu in &scope.cus {
            let written = self.out_edges(cu, Some(EdgeKind::Data)).into_iter().any(|e| {
                e.dependency.as_data().map_or(false, |d| {
                    d.dtype.is_write() && d.var_name == var && !scope.is_loop_start(d.sink)
                })
            });
            if written {
                return false;
            }
            let reverse_raw = self.in_edges(cu, Some(EdgeKind::Data)).into_iter().any(|e| {
                e.dependency
                    .data_of(DepType::Raw, Some(var))
                    .map_or(false, |d| !scope.is_loop_start(d.source))
            });
            if reverse_raw {
                return false;
            }
        }
        true
    }

    /// RAW targets of `node`'s CU-subtree, ignoring loop indices and
    /// read-only variables of `scope`
    pub fn get_all_dependencies(&self, node: NodeIndex, scope: &LoopScope) -> FxHashSet<NodeIndex> {
        let mut ignored: FxHashMap<&str, bool> = FxHashMap::default();
        let mut deps = FxHashSet::default();

        for cu in self.cu_subtree(node) {
            for e in self.out_edges(cu, Some(EdgeKind::Data)) {
                let Some(d) = e.dependency.data_of(DepType::Raw, None) else {
                    continue;
                };
                let skip = *ignored.entry(d.var_name.as_str()).or_insert_with(|| {
                    self.is_loop_index(&d.var_name, scope)
                        || self.is_readonly_inside_loop_body(&d.var_name, scope)
                });
                if !skip {
                    deps.insert(e.target);
                }
            }
        }
        deps
    }

    /// True if `source` depends on a CU inside `target`, per
    /// [`get_all_dependencies`](Self::get_all_dependencies)
    pub fn depends_ignore_readonly(&self, source: NodeIndex, target: NodeIndex, scope: &LoopScope) -> bool {
        let deps = self.get_all_dependencies(source, scope);
        if deps.is_empty() {
            return false;
        }
        self.cu_subtree(target).iter().any(|t| deps.contains(t))
    }

    /// True if any CU under `source` has a RAW dependency on any node under
    /// `target` (no filtering, distinct nodes only)
    pub fn depends(&self, source: NodeIndex, target: NodeIndex) -> bool {
        if source == target {
            return false;
        }
        let targets: FxHashSet<NodeIndex> = self.subtree_of_kind(target, None).into_iter().collect();
        self.cu_subtree(source).into_iter().any(|cu| {
            self.out_edges(cu, Some(EdgeKind::Data))
                .into_iter()
                .any(|e| e.dependency.data_of(DepType::Raw, None).is_some() && targets.contains(&e.target))
        })
    }
}
