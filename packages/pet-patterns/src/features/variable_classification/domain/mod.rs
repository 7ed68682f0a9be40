//! Variable classification models
use serde::{Deserialize, Serialize};

use crate::shared::models::Variable;

/// Pattern a classification is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternContext {
    DoAll,
    Reduction,
    GeometricDecomposition,
    Task,
}

impl PatternContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternContext::DoAll => "DoAll",
            PatternContext::Reduction => "Reduction",
            PatternContext::GeometricDecomposition => "GeometricDecomposition",
            PatternContext::Task => "Task",
        }
    }
}

/// Data-sharing classes of the variables visible in a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableClassification {
    pub context: PatternContext,
    pub first_private: Vec<Variable>,
    pub private: Vec<Variable>,
    pub shared: Vec<Variable>,
    /// Read inside, written before the region
    pub in_dep: Vec<Variable>,
    /// Written inside, read after the region
    pub out_dep: Vec<Variable>,
    pub in_out_dep: Vec<Variable>,
    /// `"op:name"` entries
    pub reduction: Vec<String>,
}

impl VariableClassification {
    pub fn empty(context: PatternContext) -> Self {
        Self {
            context,
            first_private: Vec::new(),
            private: Vec::new(),
            shared: Vec::new(),
            in_dep: Vec::new(),
            out_dep: Vec::new(),
            in_out_dep: Vec::new(),
            reduction: Vec::new(),
        }
    }

    pub fn names(vars: &[Variable]) -> Vec<String> {
        vars.iter().map(|v| v.name.clone()).collect()
    }
}
