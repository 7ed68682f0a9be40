//! Do-all and reduction detection on hand-built loop nests

use pretty_assertions::assert_eq;

use super::{DoAllDetector, ReductionDetector};
use crate::features::pet_graph::infrastructure::fixtures::GraphFixture;
use crate::features::variable_classification::DependencyVariableClassifier;
use crate::shared::models::{AnalysisFacts, LoopIterationTable, ReductionFact, SourcePosition};

fn facts_with_reduction(loop_line: u32, name: &str) -> AnalysisFacts {
    AnalysisFacts::new(
        LoopIterationTable::new(),
        vec![ReductionFact::new(SourcePosition::new(1, loop_line), name, "+")],
    )
}

#[test]
fn test_independent_children_score_one() {
    let mut fx = GraphFixture::new();
    let l = fx.lp(0, 10, 20, 8);
    let a = fx.cu(1, 11, 12, 5);
    let b = fx.cu(2, 13, 14, 5);
    let c = fx.cu(3, 15, 16, 5);
    fx.children(l, &[a, b, c]);

    assert_eq!(DoAllDetector::score(&fx.graph, l), 1.0);

    let found = DoAllDetector::default().detect(
        &mut fx.graph,
        &AnalysisFacts::default(),
        &DependencyVariableClassifier::new(),
    );
    assert_eq!(found.len(), 1);
    assert!(fx.graph.node(l).do_all);
}

#[test]
fn test_childless_loop_scores_zero() {
    let mut fx = GraphFixture::new();
    let l = fx.lp(0, 10, 20, 8);
    let score = DoAllDetector::score(&fx.graph, l);
    assert_eq!(score, 0.0);
    assert!(!score.is_nan());
}

#[test]
fn test_forward_dependency_breaks_do_all() {
    let mut fx = GraphFixture::new();
    let l = fx.lp(0, 10, 20, 8);
    let a = fx.cu(1, 11, 12, 5);
    let b = fx.cu(2, 13, 14, 5);
    fx.children(l, &[a, b]);
    // a reads x written later in the body by b: carried across iterations
    fx.raw(a, b, "x", 11, 14);

    // pairs (a,a) (a,b) (b,b) -> [1, 0, 1]
    let score = DoAllDetector::score(&fx.graph, l);
    assert!((score - 2.0 / 6f64.sqrt()).abs() < 1e-9);

    let found = DoAllDetector::default().detect(
        &mut fx.graph,
        &AnalysisFacts::default(),
        &DependencyVariableClassifier::new(),
    );
    assert!(found.is_empty());
    assert!(!fx.graph.node(l).do_all);
}

#[test]
fn test_readonly_input_does_not_break_do_all() {
    let mut fx = GraphFixture::new();
    let before = fx.cu(9, 1, 2, 1);
    let l = fx.lp(0, 10, 20, 8);
    let a = fx.cu(1, 11, 12, 5);
    let b = fx.cu(2, 13, 14, 5);
    fx.children(l, &[a, b]);
    // both read n, which only the header line ever writes
    fx.raw(a, before, "n", 11, 10);
    fx.raw(b, before, "n", 13, 10);

    assert_eq!(DoAllDetector::score(&fx.graph, l), 1.0);
}

#[test]
fn test_reduction_loop_flagged_without_do_all_suggestion() {
    let mut fx = GraphFixture::new();
    let l = fx.lp(0, 10, 20, 8);
    let body = fx.cu(1, 11, 19, 5);
    fx.children(l, &[body]);
    fx.local(body, "sum");
    let facts = facts_with_reduction(10, "sum");

    let reductions = ReductionDetector::new().detect(&mut fx.graph, &facts);
    assert_eq!(reductions.len(), 1);
    assert_eq!(reductions[0].reductions[0].name, "sum");

    let do_all = DoAllDetector::default().detect(&mut fx.graph, &facts, &DependencyVariableClassifier::new());
    assert!(do_all.is_empty());
    assert!(fx.graph.node(l).do_all);
    assert!(fx.graph.node(l).reduction);
}

#[test]
fn test_reduction_fact_keyed_by_loop_line() {
    let mut fx = GraphFixture::new();
    let l = fx.lp(0, 10, 20, 8);
    let body = fx.cu(1, 11, 19, 5);
    fx.children(l, &[body]);
    fx.local(body, "sum");

    let facts = facts_with_reduction(11, "sum");
    assert!(ReductionDetector::new().detect(&mut fx.graph, &facts).is_empty());
    assert!(!fx.graph.node(l).reduction);
}

#[test]
fn test_reduction_ignores_existing_do_all_flags() {
    let mut fx = GraphFixture::new();
    let l1 = fx.lp(0, 10, 20, 8);
    let l2 = fx.lp(2, 30, 40, 8);
    let body = fx.cu(1, 11, 19, 5);
    fx.children(l1, &[body]);
    fx.local(body, "sum");
    let facts = facts_with_reduction(10, "sum");

    ReductionDetector::new().detect(&mut fx.graph, &facts);
    let before: Vec<bool> = [l1, l2].iter().map(|&l| fx.graph.node(l).reduction).collect();

    fx.graph.node_mut(l1).do_all = true;
    fx.graph.node_mut(l2).do_all = true;
    ReductionDetector::new().detect(&mut fx.graph, &facts);
    let after: Vec<bool> = [l1, l2].iter().map(|&l| fx.graph.node(l).reduction).collect();

    assert_eq!(before, after);
    assert_eq!(after, vec![true, false]);
}
