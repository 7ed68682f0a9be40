//! Shared models

mod edge;
mod facts;
mod node;
mod pattern_info;
mod position;
mod variable;

pub use edge::{DataDependence, DepType, Dependency, EdgeKind};
pub use facts::{AnalysisFacts, LoopIterationTable, ReductionFact};
pub use node::{CuNode, NodeKind, RecursiveCall};
pub use pattern_info::PatternInfo;
pub use position::{NodeId, ParseIdError, SourcePosition};
pub use variable::Variable;
