//! Hand-built graphs for unit tests (file id 1 throughout)

use petgraph::stable_graph::NodeIndex;

use super::graph::PetGraph;
use crate::shared::models::{CuNode, DataDependence, DepType, Dependency, NodeId, NodeKind, SourcePosition, Variable};

pub(crate) fn pos(line: u32) -> SourcePosition {
    SourcePosition::new(1, line)
}

#[derive(Default)]
pub(crate) struct GraphFixture {
    pub graph: PetGraph,
}

impl GraphFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, n: u32, kind: NodeKind, start: u32, end: u32) -> NodeIndex {
        self.graph
            .add_node(CuNode::new(NodeId::new(1, n), kind, pos(start), pos(end)))
            .unwrap()
    }

    pub fn func(&mut self, n: u32, name: &str, start: u32, end: u32) -> NodeIndex {
        let idx = self.node(n, NodeKind::Func, start, end);
        self.graph.node_mut(idx).name = name.to_string();
        idx
    }

    pub fn cu(&mut self, n: u32, start: u32, end: u32, instructions: u64) -> NodeIndex {
        let idx = self.node(n, NodeKind::Cu, start, end);
        self.graph.node_mut(idx).instructions_count = instructions;
        idx
    }

    pub fn lp(&mut self, n: u32, start: u32, end: u32, iterations: i64) -> NodeIndex {
        let idx = self.node(n, NodeKind::Loop, start, end);
        self.graph.node_mut(idx).loop_iterations = iterations;
        idx
    }

    pub fn children(&mut self, parent: NodeIndex, children: &[NodeIndex]) {
        for &c in children {
            self.graph.add_edge(parent, c, Dependency::Child);
        }
    }

    pub fn local(&mut self, idx: NodeIndex, name: &str) {
        self.graph.node_mut(idx).local_vars.push(Variable::new("int", name));
    }

    pub fn dep(&mut self, from: NodeIndex, to: NodeIndex, dtype: DepType, var: &str, sink: u32, source: u32) {
        self.graph.add_edge(
            from,
            to,
            Dependency::Data(DataDependence {
                dtype,
                var_name: var.to_string(),
                source: pos(source),
                sink: pos(sink),
            }),
        );
    }

    /// `reader` reads `var` at `sink`, written by `writer` at `source`
    pub fn raw(&mut self, reader: NodeIndex, writer: NodeIndex, var: &str, sink: u32, source: u32) {
        self.dep(reader, writer, DepType::Raw, var, sink, source);
    }
}
