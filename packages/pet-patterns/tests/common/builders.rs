//! Test data builders

use pet_patterns::features::pet_graph::{CuRecord, DependenceRecord, PetInput};
use pet_patterns::shared::models::{AnalysisFacts, LoopIterationTable, NodeId, NodeKind, ReductionFact, SourcePosition};

/// Position in file 1
pub fn at(line: u32) -> SourcePosition {
    SourcePosition::new(1, line)
}

/// Node `n` of file 1
pub fn id(n: u32) -> NodeId {
    NodeId::new(1, n)
}

/// Builder for [`PetInput`] payloads, nodes addressed by number
#[derive(Debug, Default)]
pub struct PetGraphFixture {
    nodes: Vec<CuRecord>,
    dependencies: Vec<DependenceRecord>,
    loop_iterations: LoopIterationTable,
    reductions: Vec<ReductionFact>,
}

impl PetGraphFixture {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, n: u32) -> &mut CuRecord {
        let idx = self
            .nodes
            .iter()
            .position(|r| r.id == id(n))
            .unwrap_or_else(|| panic!("node {} not declared", n));
        &mut self.nodes[idx]
    }

    pub fn func(mut self, n: u32, name: &str, start: u32, end: u32) -> Self {
        self.nodes
            .push(CuRecord::new(id(n), NodeKind::Func, at(start), at(end)).with_name(name));
        self
    }

    pub fn cu(mut self, n: u32, start: u32, end: u32, instructions: u64) -> Self {
        self.nodes
            .push(CuRecord::new(id(n), NodeKind::Cu, at(start), at(end)).with_instructions(instructions));
        self
    }

    /// Loop node; `iterations` goes into the trip-count table
    pub fn lp(mut self, n: u32, start: u32, end: u32, iterations: u64) -> Self {
        self.nodes.push(CuRecord::new(id(n), NodeKind::Loop, at(start), at(end)));
        self.loop_iterations.insert(at(start), iterations);
        self
    }

    pub fn children(mut self, parent: u32, children: &[u32]) -> Self {
        self.record(parent).children.extend(children.iter().map(|&c| id(c)));
        self
    }

    pub fn successor(mut self, from: u32, to: u32) -> Self {
        self.record(from).successors.push(id(to));
        self
    }

    pub fn local(mut self, n: u32, name: &str) -> Self {
        self.record(n).local_vars.push(pet_patterns::shared::models::Variable::new("int", name));
        self
    }

    pub fn reads(mut self, n: u32, line: u32) -> Self {
        self.record(n).read_lines.push(at(line));
        self
    }

    pub fn writes(mut self, n: u32, line: u32) -> Self {
        self.record(n).write_lines.push(at(line));
        self
    }

    pub fn call(mut self, n: u32, function: &str, line: u32) -> Self {
        let record = self.record(n);
        *record = record.clone().with_recursive_call(function, at(line));
        self
    }

    /// RAW dependency read at `sink`, written at `source`
    pub fn raw(mut self, sink: u32, source: u32, var: &str) -> Self {
        self.dependencies.push(DependenceRecord::raw(at(sink), at(source), var));
        self
    }

    pub fn dependency(mut self, record: DependenceRecord) -> Self {
        self.dependencies.push(record);
        self
    }

    pub fn reduction(mut self, loop_line: u32, var: &str, operation: &str) -> Self {
        self.reductions.push(ReductionFact::new(at(loop_line), var, operation));
        self
    }

    pub fn build(self) -> (PetInput, AnalysisFacts) {
        (
            PetInput::new(self.nodes, self.dependencies),
            AnalysisFacts::new(self.loop_iterations, self.reductions),
        )
    }
}
