//! Edge payloads of the PET multigraph

use serde::{Deserialize, Serialize};

use super::SourcePosition;

/// Edge category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgeKind {
    /// Static containment (FUNC -> LOOP/CU, LOOP -> CU, CU -> CU)
    Child,
    /// Intraprocedural control flow order
    Successor,
    /// Data dependency, oriented sink CU -> source CU
    Data,
}

/// Data dependency type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DepType {
    /// Read after write
    Raw,
    /// Write after read
    War,
    /// Write after write
    Waw,
}

impl DepType {
    /// WAR and WAW both mean the sink statement writes the variable
    pub fn is_write(&self) -> bool {
        matches!(self, DepType::War | DepType::Waw)
    }
}

/// Payload of a DATA edge
///
/// `source`/`sink` pinpoint statements and are kept exactly as the upstream
/// dependency record stated them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDependence {
    pub dtype: DepType,
    pub var_name: String,
    pub source: SourcePosition,
    pub sink: SourcePosition,
}

/// Edge weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Dependency {
    Child,
    Successor,
    Data(DataDependence),
}

impl Dependency {
    pub fn kind(&self) -> EdgeKind {
        match self {
            Dependency::Child => EdgeKind::Child,
            Dependency::Successor => EdgeKind::Successor,
            Dependency::Data(_) => EdgeKind::Data,
        }
    }

    pub fn as_data(&self) -> Option<&DataDependence> {
        match self {
            Dependency::Data(d) => Some(d),
            _ => None,
        }
    }

    /// DATA edge of the given type, optionally restricted to one variable
    pub fn data_of(&self, dtype: DepType, var_name: Option<&str>) -> Option<&DataDependence> {
        self.as_data()
            .filter(|d| d.dtype == dtype && var_name.map_or(true, |v| d.var_name == v))
    }
}
