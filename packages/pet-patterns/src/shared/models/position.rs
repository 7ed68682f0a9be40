//! Node identifiers and source positions
//!
//! Both are `(file, n)` pairs rendered as `"file:n"`, which is also their
//! serialized form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Malformed `"file:n"` string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed identifier '{0}', expected 'file:number'")]
pub struct ParseIdError(pub String);

fn parse_pair(s: &str) -> Result<(u32, u32), ParseIdError> {
    let (left, right) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| ParseIdError(s.to_string()))?;
    let left = left.trim().parse().map_err(|_| ParseIdError(s.to_string()))?;
    let right = right.trim().parse().map_err(|_| ParseIdError(s.to_string()))?;
    Ok((left, right))
}

/// Composite node key `(file_id, node_id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId {
    pub file_id: u32,
    pub node_id: u32,
}

impl NodeId {
    pub fn new(file_id: u32, node_id: u32) -> Self {
        Self { file_id, node_id }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_id, self.node_id)
    }
}

impl FromStr for NodeId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pair(s).map(|(file_id, node_id)| Self::new(file_id, node_id))
    }
}

impl TryFrom<String> for NodeId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

/// Statement position `(file, line)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourcePosition {
    pub file: u32,
    pub line: u32,
}

impl SourcePosition {
    pub fn new(file: u32, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl FromStr for SourcePosition {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pair(s).map(|(file, line)| Self::new(file, line))
    }
}

impl TryFrom<String> for SourcePosition {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SourcePosition> for String {
    fn from(pos: SourcePosition) -> Self {
        pos.to_string()
    }
}
