//! PET node model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{NodeId, ParseIdError, SourcePosition, Variable};

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    /// Computation unit (basic block or statement group)
    Cu,
    Func,
    Loop,
    /// Placeholder without analysis meaning
    Dummy,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Cu => "CU",
            NodeKind::Func => "FUNC",
            NodeKind::Loop => "LOOP",
            NodeKind::Dummy => "DUMMY",
        }
    }
}

/// Recursive call site recorded on a node, textually `"fib 7:35"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveCall {
    pub function_name: String,
    pub position: SourcePosition,
}

impl RecursiveCall {
    pub fn new(function_name: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            function_name: function_name.into(),
            position,
        }
    }
}

impl FromStr for RecursiveCall {
    type Err = ParseIdError;

    /// Parses `"name file:line"`; commas and surrounding blanks are ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.replace(',', "");
        let (name, position) = cleaned
            .trim()
            .split_once(' ')
            .ok_or_else(|| ParseIdError(s.to_string()))?;
        Ok(Self::new(name, position.replace(' ', "").parse()?))
    }
}

/// Computation unit, function, loop or dummy node
///
/// Everything except the analysis flags is fixed at graph-build time. Each
/// flag is written by exactly one detector pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub name: String,
    pub instructions_count: u64,
    /// Loop nodes only; `-1` until filled from the loop-count table
    pub loop_iterations: i64,
    pub local_vars: Vec<Variable>,
    pub global_vars: Vec<Variable>,
    pub recursive_calls: Vec<RecursiveCall>,

    // Analysis flags
    pub reduction: bool,
    pub do_all: bool,
    pub geometric_decomposition: bool,
    /// Negative = not evaluated
    pub pipeline: f64,
}

impl CuNode {
    pub fn new(id: NodeId, kind: NodeKind, start: SourcePosition, end: SourcePosition) -> Self {
        Self {
            id,
            kind,
            start,
            end,
            name: String::new(),
            instructions_count: 0,
            loop_iterations: -1,
            local_vars: Vec::new(),
            global_vars: Vec::new(),
            recursive_calls: Vec::new(),
            reduction: false,
            do_all: false,
            geometric_decomposition: false,
            pipeline: -1.0,
        }
    }

    /// Stand-in for a node referenced by an edge but never declared
    pub fn placeholder(id: NodeId) -> Self {
        let pos = SourcePosition::new(id.file_id, 0);
        let mut node = Self::new(id, NodeKind::Dummy, pos, pos);
        node.name = "<unresolved>".to_string();
        node
    }

    pub fn start_line(&self) -> u32 {
        self.start.line
    }

    pub fn end_line(&self) -> u32 {
        self.end.line
    }

    /// Whether `pos` lies inside this node's line range (same file)
    pub fn contains_position(&self, pos: SourcePosition) -> bool {
        self.start.file == pos.file && self.start.line <= pos.line && pos.line <= self.end.line
    }

    /// Whether `other`'s line range lies inside this node's line range
    pub fn covers(&self, other: &CuNode) -> bool {
        self.start.line <= other.start.line && self.end.line >= other.end.line
    }

    /// Local and global variables, in declaration order
    pub fn all_vars(&self) -> impl Iterator<Item = &Variable> {
        self.local_vars.iter().chain(self.global_vars.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursive_call_parse() {
        let call: RecursiveCall = " fib 7:35,".parse().unwrap();
        assert_eq!(call.function_name, "fib");
        assert_eq!(call.position, SourcePosition::new(7, 35));
        assert!("fib".parse::<RecursiveCall>().is_err());
    }

    #[test]
    fn test_contains_position_checks_file() {
        let node = CuNode::new(
            NodeId::new(1, 1),
            NodeKind::Cu,
            SourcePosition::new(1, 10),
            SourcePosition::new(1, 20),
        );
        assert!(node.contains_position(SourcePosition::new(1, 10)));
        assert!(node.contains_position(SourcePosition::new(1, 20)));
        assert!(!node.contains_position(SourcePosition::new(2, 15)));
        assert!(!node.contains_position(SourcePosition::new(1, 21)));
    }

    #[test]
    fn test_placeholder_is_dummy() {
        let node = CuNode::placeholder(NodeId::new(4, 2));
        assert_eq!(node.kind, NodeKind::Dummy);
        assert!(node.pipeline < 0.0);
    }
}
