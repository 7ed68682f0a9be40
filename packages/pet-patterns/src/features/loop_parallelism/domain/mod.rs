//! Loop-level pattern records
use serde::{Deserialize, Serialize};

use crate::features::variable_classification::VariableClassification;
use crate::shared::models::{PatternInfo, ReductionFact};

/// Loop without cross-iteration dependencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoAllInfo {
    pub info: PatternInfo,
    /// Cosine similarity against the all-independent vector
    pub score: f64,
    pub variables: VariableClassification,
}

/// Loop accumulating into known reduction variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionInfo {
    pub info: PatternInfo,
    /// Facts matched by the loop's variables, in declaration order
    pub reductions: Vec<ReductionFact>,
}
