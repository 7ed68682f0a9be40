//! Graph construction from ingestion records

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::graph::PetGraph;
use crate::errors::Result;
use crate::features::pet_graph::domain::{CuRecord, IngestReport, PetInput, RawDepType};
use crate::shared::models::{
    AnalysisFacts, CuNode, DataDependence, DepType, Dependency, NodeId, NodeKind, SourcePosition,
};
use petgraph::stable_graph::NodeIndex;

/// Builds a [`PetGraph`] from node and dependency records
#[derive(Debug, Clone)]
pub struct PetGraphBuilder {
    remove_dummy_children: bool,
}

impl Default for PetGraphBuilder {
    fn default() -> Self {
        Self {
            remove_dummy_children: true,
        }
    }
}

impl PetGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// On by default; also drops the edges to placeholders of dangling
    /// CHILD references
    pub fn remove_dummy_children(mut self, enabled: bool) -> Self {
        self.remove_dummy_children = enabled;
        self
    }

    /// Build the graph
    ///
    /// Fails only on duplicate node ids or CHILD cycles. Dangling references
    /// and unresolvable dependency positions are recorded in the report.
    pub fn build(&self, input: &PetInput, facts: &AnalysisFacts) -> Result<(PetGraph, IngestReport)> {
        let mut graph = PetGraph::new();
        let mut report = IngestReport::default();

        let mut read_map: FxHashMap<SourcePosition, Vec<NodeIndex>> = FxHashMap::default();
        let mut write_map: FxHashMap<SourcePosition, Vec<NodeIndex>> = FxHashMap::default();

        for record in &input.nodes {
            let idx = graph.add_node(to_node(record, facts))?;
            for pos in &record.read_lines {
                read_map.entry(*pos).or_default().push(idx);
            }
            for pos in &record.write_lines {
                write_map.entry(*pos).or_default().push(idx);
            }
        }

        for record in &input.nodes {
            let Some(source) = graph.index_of(record.id) else {
                continue;
            };
            for child in &record.children {
                let target = resolve_or_placeholder(&mut graph, &mut report, *child, "child")?;
                graph.add_edge(source, target, Dependency::Child);
                report.child_edges += 1;
            }
            for successor in &record.successors {
                let target = resolve_or_placeholder(&mut graph, &mut report, *successor, "successor")?;
                graph.add_edge(source, target, Dependency::Successor);
                report.successor_edges += 1;
            }
        }

        for dep in &input.dependencies {
            let dtype = match dep.dep_type {
                RawDepType::Init => {
                    report.skipped_init_dependencies += 1;
                    continue;
                }
                RawDepType::Raw => DepType::Raw,
                RawDepType::War => DepType::War,
                RawDepType::Waw => DepType::Waw,
            };

            let sinks = read_map.get(&dep.sink).map(Vec::as_slice).unwrap_or_default();
            let sources = write_map.get(&dep.source).map(Vec::as_slice).unwrap_or_default();
            if sinks.is_empty() || sources.is_empty() {
                let msg = format!(
                    "unresolved dependency {:?} {} -> {} on '{}'",
                    dtype, dep.sink, dep.source, dep.var_name
                );
                warn!("{}", msg);
                report.warnings.push(msg);
                continue;
            }

            for &sink_cu in sinks {
                for &source_cu in sources {
                    if sink_cu == source_cu && dtype.is_write() {
                        continue;
                    }
                    graph.add_edge(
                        sink_cu,
                        source_cu,
                        Dependency::Data(DataDependence {
                            dtype,
                            var_name: dep.var_name.clone(),
                            source: dep.source,
                            sink: dep.sink,
                        }),
                    );
                    report.data_edges += 1;
                }
            }
        }

        graph.check_child_acyclic()?;

        if self.remove_dummy_children {
            report.removed_dummy_children = graph.remove_dummy_children();
        }

        report.nodes = graph.node_count();
        debug!(
            "PET built: {} nodes, {} child, {} successor, {} data edges, {} warnings",
            report.nodes,
            report.child_edges,
            report.successor_edges,
            report.data_edges,
            report.warnings.len()
        );
        Ok((graph, report))
    }
}

fn to_node(record: &CuRecord, facts: &AnalysisFacts) -> CuNode {
    let mut node = CuNode::new(record.id, record.kind, record.start, record.end);
    node.name = record.name.clone();
    node.instructions_count = record.instructions_count;
    node.local_vars = record.local_vars.clone();
    node.global_vars = record.global_vars.clone();
    node.recursive_calls = record.recursive_calls.clone();
    if record.kind == NodeKind::Loop {
        let iterations = facts.loop_iterations.get(record.start);
        node.loop_iterations = i64::try_from(iterations).unwrap_or(i64::MAX);
    }
    node
}

fn resolve_or_placeholder(
    graph: &mut PetGraph,
    report: &mut IngestReport,
    id: NodeId,
    relation: &str,
) -> Result<NodeIndex> {
    if let Some(idx) = graph.index_of(id) {
        return Ok(idx);
    }
    let msg = format!("no {} node {} found", relation, id);
    warn!("{}", msg);
    report.warnings.push(msg);
    report.placeholders += 1;
    graph.add_node(CuNode::placeholder(id))
}
