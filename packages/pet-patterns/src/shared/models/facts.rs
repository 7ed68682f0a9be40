//! Auxiliary fact tables consulted (never mutated) by the detectors

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::SourcePosition;

/// Reduction variable of a loop, as reported by the upstream analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionFact {
    /// Start position of the reducing loop
    pub loop_line: SourcePosition,
    pub name: String,
    /// Reduction operator, e.g. `+`
    pub operation: String,
}

impl ReductionFact {
    pub fn new(loop_line: SourcePosition, name: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            loop_line,
            name: name.into(),
            operation: operation.into(),
        }
    }

    /// Variable name with the `.addr` suffix of spilled locals removed
    pub fn clause_name(&self) -> String {
        self.name.replace(".addr", "")
    }
}

/// Loop start position -> iteration count (0 = unknown/dynamic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoopIterationTable {
    counts: FxHashMap<SourcePosition, u64>,
}

impl LoopIterationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: SourcePosition, iterations: u64) {
        self.counts.insert(position, iterations);
    }

    pub fn with(mut self, position: SourcePosition, iterations: u64) -> Self {
        self.insert(position, iterations);
        self
    }

    /// Iteration count, absent entries default to 0
    pub fn get(&self, position: SourcePosition) -> u64 {
        self.counts.get(&position).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Fact tables shared by all detectors of one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisFacts {
    pub loop_iterations: LoopIterationTable,
    pub reduction_vars: Vec<ReductionFact>,
}

impl AnalysisFacts {
    pub fn new(loop_iterations: LoopIterationTable, reduction_vars: Vec<ReductionFact>) -> Self {
        Self {
            loop_iterations,
            reduction_vars,
        }
    }

    pub fn is_reduction_var(&self, loop_line: SourcePosition, name: &str) -> bool {
        self.reduction_vars
            .iter()
            .any(|rv| rv.loop_line == loop_line && rv.name == name)
    }

    /// Facts recorded for one loop
    pub fn reduction_facts_for(&self, loop_line: SourcePosition) -> impl Iterator<Item = &ReductionFact> {
        self.reduction_vars
            .iter()
            .filter(move |rv| rv.loop_line == loop_line)
    }

    pub fn reduction_fact(&self, loop_line: SourcePosition, name: &str) -> Option<&ReductionFact> {
        self.reduction_facts_for(loop_line).find(|rv| rv.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_loop_count_is_zero() {
        let table = LoopIterationTable::new().with(SourcePosition::new(1, 5), 100);
        assert_eq!(table.get(SourcePosition::new(1, 5)), 100);
        assert_eq!(table.get(SourcePosition::new(1, 6)), 0);
    }

    #[test]
    fn test_reduction_lookup_is_keyed_by_loop_line() {
        let facts = AnalysisFacts::new(
            LoopIterationTable::new(),
            vec![ReductionFact::new(SourcePosition::new(1, 3), "sum.addr", "+")],
        );
        assert!(facts.is_reduction_var(SourcePosition::new(1, 3), "sum.addr"));
        assert!(!facts.is_reduction_var(SourcePosition::new(1, 4), "sum.addr"));
        assert_eq!(
            facts
                .reduction_fact(SourcePosition::new(1, 3), "sum.addr")
                .map(|f| f.clause_name()),
            Some("sum".to_string())
        );
    }

    #[test]
    fn test_loop_table_json_keys() {
        let json = r#"{"1:5": 100, "2:7": 0}"#;
        let table: LoopIterationTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.get(SourcePosition::new(1, 5)), 100);
        assert_eq!(table.len(), 2);
    }
}
