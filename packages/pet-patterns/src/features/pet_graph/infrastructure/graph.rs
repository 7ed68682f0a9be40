//! PET graph storage and structural queries
//!
//! Nodes and edges live in a petgraph `StableDiGraph` (parallel edges
//! allowed), with an id -> index map for lookups. Edge queries always return
//! edges in insertion order; several detectors depend on child order.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{PatternError, Result};
use crate::shared::models::{CuNode, Dependency, EdgeKind, NodeId, NodeKind};

/// Borrowed view of one edge
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub id: EdgeIndex,
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub dependency: &'a Dependency,
}

/// Program Execution Tree
#[derive(Debug, Clone, Default)]
pub struct PetGraph {
    graph: StableDiGraph<CuNode, Dependency>,
    node_map: FxHashMap<NodeId, NodeIndex>,
}

impl PetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node; ids must be unique
    pub fn add_node(&mut self, node: CuNode) -> Result<NodeIndex> {
        if self.node_map.contains_key(&node.id) {
            return Err(PatternError::ingest(format!("duplicate node id {}", node.id)));
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_map.insert(id, idx);
        Ok(idx)
    }

    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, dependency: Dependency) -> EdgeIndex {
        self.graph.add_edge(source, target, dependency)
    }

    pub fn remove_edge(&mut self, edge: EdgeIndex) -> Option<Dependency> {
        self.graph.remove_edge(edge)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_map.get(&id).copied()
    }

    /// Like [`index_of`](Self::index_of), as an error for public entry points
    pub fn require(&self, id: NodeId) -> Result<NodeIndex> {
        self.index_of(id).ok_or(PatternError::UnknownNode(id))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&CuNode> {
        self.index_of(id).and_then(|idx| self.graph.node_weight(idx))
    }

    /// Node at `idx`
    ///
    /// # Panics
    /// If `idx` was not produced by this graph.
    pub fn node(&self, idx: NodeIndex) -> &CuNode {
        &self.graph[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut CuNode {
        &mut self.graph[idx]
    }

    /// All node indices in insertion order
    pub fn node_indices(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CuNode> {
        self.graph.node_weights()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].kind == kind)
            .collect()
    }

    /// FUNC node with the given name
    pub fn function_named(&self, name: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].kind == NodeKind::Func && self.graph[idx].name == name)
    }

    fn edges(&self, idx: NodeIndex, dir: Direction, kind: Option<EdgeKind>) -> Vec<EdgeView<'_>> {
        let mut edges: Vec<EdgeView<'_>> = self
            .graph
            .edges_directed(idx, dir)
            .filter(|e| kind.map_or(true, |k| e.weight().kind() == k))
            .map(|e| EdgeView {
                id: e.id(),
                source: e.source(),
                target: e.target(),
                dependency: e.weight(),
            })
            .collect();
        edges.sort_by_key(|e| e.id);
        edges
    }

    /// Outgoing edges, optionally restricted to one kind
    pub fn out_edges(&self, idx: NodeIndex, kind: Option<EdgeKind>) -> Vec<EdgeView<'_>> {
        self.edges(idx, Direction::Outgoing, kind)
    }

    /// Incoming edges, optionally restricted to one kind
    pub fn in_edges(&self, idx: NodeIndex, kind: Option<EdgeKind>) -> Vec<EdgeView<'_>> {
        self.edges(idx, Direction::Incoming, kind)
    }

    /// Direct CHILD targets in insertion order
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.out_edges(idx, Some(EdgeKind::Child))
            .into_iter()
            .map(|e| e.target)
            .collect()
    }

    pub fn has_children(&self, idx: NodeIndex) -> bool {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .any(|e| e.weight().kind() == EdgeKind::Child)
    }

    /// CHILD sources (containing nodes)
    pub fn parents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.in_edges(idx, Some(EdgeKind::Child))
            .into_iter()
            .map(|e| e.source)
            .collect()
    }

    pub fn direct_children_of_kind(&self, root: NodeIndex, kind: NodeKind) -> Vec<NodeIndex> {
        self.children(root)
            .into_iter()
            .filter(|&c| self.graph[c].kind == kind)
            .collect()
    }

    /// Pre-order DFS over CHILD edges, `root` included if it matches
    ///
    /// `None` collects every node. Shared subtrees are reported once.
    pub fn subtree_of_kind(&self, root: NodeIndex, kind: Option<NodeKind>) -> Vec<NodeIndex> {
        let mut result = Vec::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![root];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if kind.map_or(true, |k| self.graph[current].kind == k) {
                result.push(current);
            }
            let children = self.children(current);
            stack.extend(children.into_iter().rev());
        }
        result
    }

    /// CU-subtree, the unit most dependency queries work on
    pub fn cu_subtree(&self, root: NodeIndex) -> Vec<NodeIndex> {
        self.subtree_of_kind(root, Some(NodeKind::Cu))
    }

    /// Reject containment cycles
    pub fn check_child_acyclic(&self) -> Result<()> {
        let mut containment: petgraph::graph::DiGraph<NodeIndex, ()> = petgraph::graph::DiGraph::new();
        let mut local: FxHashMap<NodeIndex, petgraph::graph::NodeIndex> = FxHashMap::default();
        for idx in self.graph.node_indices() {
            local.insert(idx, containment.add_node(idx));
        }
        for edge in self.graph.edge_indices() {
            if self.graph[edge].kind() != EdgeKind::Child {
                continue;
            }
            if let Some((source, target)) = self.graph.edge_endpoints(edge) {
                containment.add_edge(local[&source], local[&target], ());
            }
        }
        petgraph::algo::toposort(&containment, None)
            .map(|_| ())
            .map_err(|cycle| {
                let at = containment[cycle.node_id()];
                PatternError::ingest(format!("CHILD cycle through node {}", self.graph[at].id))
            })
    }

    /// Drop CHILD edges that point at DUMMY nodes; returns the number removed
    pub fn remove_dummy_children(&mut self) -> usize {
        let doomed: Vec<EdgeIndex> = self
            .graph
            .edge_indices()
            .filter(|&e| {
                self.graph[e].kind() == EdgeKind::Child
                    && self.graph.edge_endpoints(e).map_or(false, |(s, t)| {
                        self.graph[s].kind != NodeKind::Dummy && self.graph[t].kind == NodeKind::Dummy
                    })
            })
            .collect();
        for edge in &doomed {
            self.graph.remove_edge(*edge);
        }
        doomed.len()
    }
}
