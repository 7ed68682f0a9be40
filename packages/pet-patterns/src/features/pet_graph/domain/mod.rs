//! Ingestion records for the PET graph
//!
//! These are the shapes handed over by the upstream parser. They carry raw
//! adjacency (ids) and statement positions; [`PetGraphBuilder`] resolves
//! them into typed nodes and edges.
//!
//! [`PetGraphBuilder`]: super::infrastructure::builder::PetGraphBuilder

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::shared::models::{NodeId, NodeKind, RecursiveCall, SourcePosition, Variable};

/// One node record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuRecord {
    pub id: NodeId,
    pub kind: NodeKind,
    pub start: SourcePosition,
    pub end: SourcePosition,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instructions_count: u64,
    #[serde(default)]
    pub local_vars: Vec<Variable>,
    #[serde(default)]
    pub global_vars: Vec<Variable>,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub successors: Vec<NodeId>,
    /// Statements of this unit that read memory
    #[serde(default)]
    pub read_lines: Vec<SourcePosition>,
    /// Statements of this unit that write memory
    #[serde(default)]
    pub write_lines: Vec<SourcePosition>,
    #[serde(default)]
    pub recursive_calls: Vec<RecursiveCall>,
}

impl CuRecord {
    pub fn new(id: NodeId, kind: NodeKind, start: SourcePosition, end: SourcePosition) -> Self {
        Self {
            id,
            kind,
            start,
            end,
            name: String::new(),
            instructions_count: 0,
            local_vars: Vec::new(),
            global_vars: Vec::new(),
            children: Vec::new(),
            successors: Vec::new(),
            read_lines: Vec::new(),
            write_lines: Vec::new(),
            recursive_calls: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_instructions(mut self, count: u64) -> Self {
        self.instructions_count = count;
        self
    }

    pub fn with_local_var(mut self, declared_type: &str, name: &str) -> Self {
        self.local_vars.push(Variable::new(declared_type, name));
        self
    }

    pub fn with_global_var(mut self, declared_type: &str, name: &str) -> Self {
        self.global_vars.push(Variable::new(declared_type, name));
        self
    }

    pub fn with_child(mut self, child: NodeId) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_successor(mut self, successor: NodeId) -> Self {
        self.successors.push(successor);
        self
    }

    pub fn reads(mut self, position: SourcePosition) -> Self {
        self.read_lines.push(position);
        self
    }

    pub fn writes(mut self, position: SourcePosition) -> Self {
        self.write_lines.push(position);
        self
    }

    pub fn with_recursive_call(mut self, function_name: &str, position: SourcePosition) -> Self {
        self.recursive_calls.push(RecursiveCall::new(function_name, position));
        self
    }
}

/// Dependency type as reported upstream, including initialisation records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RawDepType {
    Raw,
    War,
    Waw,
    Init,
}

/// One dependency record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependenceRecord {
    pub dep_type: RawDepType,
    /// Statement performing the earlier access
    pub source: SourcePosition,
    /// Statement performing the later access
    pub sink: SourcePosition,
    pub var_name: String,
}

impl DependenceRecord {
    pub fn new(
        dep_type: RawDepType,
        sink: SourcePosition,
        source: SourcePosition,
        var_name: impl Into<String>,
    ) -> Self {
        Self {
            dep_type,
            source,
            sink,
            var_name: var_name.into(),
        }
    }

    pub fn raw(sink: SourcePosition, source: SourcePosition, var_name: &str) -> Self {
        Self::new(RawDepType::Raw, sink, source, var_name)
    }

    pub fn war(sink: SourcePosition, source: SourcePosition, var_name: &str) -> Self {
        Self::new(RawDepType::War, sink, source, var_name)
    }

    pub fn waw(sink: SourcePosition, source: SourcePosition, var_name: &str) -> Self {
        Self::new(RawDepType::Waw, sink, source, var_name)
    }
}

/// Complete ingestion payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetInput {
    pub nodes: Vec<CuRecord>,
    #[serde(default)]
    pub dependencies: Vec<DependenceRecord>,
}

impl PetInput {
    pub fn new(nodes: Vec<CuRecord>, dependencies: Vec<DependenceRecord>) -> Self {
        Self {
            nodes,
            dependencies,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Data-quality summary of one graph build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub nodes: usize,
    pub child_edges: usize,
    pub successor_edges: usize,
    pub data_edges: usize,
    pub skipped_init_dependencies: usize,
    /// Placeholder nodes created for dangling CHILD/SUCCESSOR references
    pub placeholders: usize,
    pub removed_dummy_children: usize,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_from_json() {
        let json = r#"{
            "nodes": [
                {"id": "1:0", "kind": "FUNC", "start": "1:1", "end": "1:9",
                 "name": "main", "children": ["1:1"]},
                {"id": "1:1", "kind": "CU", "start": "1:2", "end": "1:3",
                 "read_lines": ["1:3"], "write_lines": ["1:2"],
                 "recursive_calls": [{"function_name": "f", "position": "1:3"}]}
            ],
            "dependencies": [
                {"dep_type": "RAW", "source": "1:2", "sink": "1:3", "var_name": "x"}
            ]
        }"#;
        let input = PetInput::from_json_str(json).unwrap();
        assert_eq!(input.nodes.len(), 2);
        assert_eq!(input.nodes[0].children, vec![NodeId::new(1, 1)]);
        assert_eq!(input.dependencies[0].dep_type, RawDepType::Raw);
        assert_eq!(input.nodes[1].recursive_calls[0].function_name, "f");
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(PetInput::from_json_str(r#"{"nodes": [{"id": "x"}]}"#).is_err());
    }
}
