//! Whole-pass task parallelism runs on hand-built graphs

use petgraph::stable_graph::NodeIndex;
use pretty_assertions::assert_eq;

use crate::config::DetectionConfig;
use crate::errors::{PatternError, Result};
use crate::features::pet_graph::infrastructure::fixtures::{pos, GraphFixture};
use crate::features::task_parallelism::application::TaskParallelismDetector;
use crate::features::task_parallelism::domain::{MwType, TaskParallelismResult, TaskPragma};
use crate::features::variable_classification::DependencyVariableClassifier;
use crate::shared::models::{AnalysisFacts, RecursiveCall};

struct Fib {
    f: GraphFixture,
    main: NodeIndex,
    fib: NodeIndex,
    first: NodeIndex,
    second: NodeIndex,
    sum: NodeIndex,
}

/// `main` calls `fib`; both recursive halves read `n` and feed `sum`
fn fib() -> Fib {
    let mut f = GraphFixture::new();
    let main = f.func(0, "main", 1, 12);
    let call = f.cu(1, 8, 10, 50);
    let fib = f.func(2, "fib", 40, 50);
    let first = f.cu(3, 43, 44, 500);
    let second = f.cu(4, 45, 46, 500);
    let sum = f.cu(5, 47, 49, 20);
    let init = f.cu(6, 41, 42, 10);
    f.children(main, &[call]);
    f.children(call, &[fib]);
    f.children(fib, &[first, second, sum, init]);
    f.raw(sum, first, "x", 48, 44);
    f.raw(sum, second, "y", 48, 46);
    f.raw(first, init, "n", 43, 41);
    f.raw(second, init, "n", 45, 41);
    f.graph.node_mut(first).recursive_calls.push(RecursiveCall::new("fib", pos(44)));
    f.graph.node_mut(second).recursive_calls.push(RecursiveCall::new("fib", pos(46)));
    Fib {
        f,
        main,
        fib,
        first,
        second,
        sum,
    }
}

fn run(f: &GraphFixture, config: &DetectionConfig) -> Result<TaskParallelismResult> {
    TaskParallelismDetector::from_config(config).detect(
        &f.graph,
        &AnalysisFacts::default(),
        &DependencyVariableClassifier::new(),
    )
}

#[test]
fn test_missing_entry_function_is_fatal() {
    let mut f = GraphFixture::new();
    let helper = f.func(0, "helper", 1, 10);
    let a = f.cu(1, 2, 3, 5);
    f.children(helper, &[a]);

    let err = run(&f, &DetectionConfig::default()).unwrap_err();
    assert!(matches!(err, PatternError::MissingEntryNode(ref name) if name == "main"));
}

#[test]
fn test_configured_entry_function_is_used() {
    let mut f = GraphFixture::new();
    let helper = f.func(0, "helper", 1, 10);
    let a = f.cu(1, 2, 3, 5);
    f.children(helper, &[a]);

    let config = DetectionConfig::default().entry_function("helper");
    let result = run(&f, &config).unwrap();
    assert_eq!(result.forks[0].node_id, f.graph.node(helper).id);
}

#[test]
fn test_fib_yields_tasks_taskwait_and_region() {
    let fx = fib();
    let result = run(&fx.f, &DetectionConfig::default()).unwrap();

    let pragmas: Vec<_> = result.suggestions.iter().map(|s| (s.pragma.clone(), s.pragma_line)).collect();
    assert_eq!(
        pragmas,
        vec![
            (TaskPragma::Task, pos(44)),
            (TaskPragma::Task, pos(46)),
            (TaskPragma::Taskwait, pos(48)),
        ]
    );

    assert_eq!(result.regions.len(), 1);
    assert_eq!(result.regions[0].info.node_id, fx.f.graph.node(fx.main).id);
    assert_eq!(result.regions[0].region_start_line, pos(8));
    assert_eq!(result.regions[0].region_end_line, pos(10));

    assert!(result.omittable.is_empty());
    assert_eq!(result.roles[&fx.f.graph.node(fx.first).id], MwType::Worker);
    assert_eq!(result.roles[&fx.f.graph.node(fx.sum).id], MwType::Barrier);
}

#[test]
fn test_light_workers_are_merged_away() {
    let fx = fib();
    let result = run(&fx.f, &DetectionConfig::default()).unwrap();

    let fib_id = fx.f.graph.node(fx.fib).id;
    let tree = result.forks.iter().find(|t| t.node_id == fib_id).unwrap();
    assert!(tree.child_tasks.is_empty());
    for n in [fx.first, fx.second, fx.sum] {
        assert!(tree.nodes.contains(&fx.f.graph.node(n).id));
    }
}

#[test]
fn test_unmerged_trees_keep_worker_tasks() {
    let fx = fib();
    let config = DetectionConfig::default().merge_task_trees(false);
    let result = run(&fx.f, &config).unwrap();

    let ids: Vec<_> = result.forks.iter().map(|t| t.node_id).collect();
    assert_eq!(ids[0], fx.f.graph.node(fx.main).id);
    assert_eq!(ids.len(), 4);

    let fib_id = fx.f.graph.node(fx.fib).id;
    let tree = result.forks.iter().find(|t| t.node_id == fib_id).unwrap();
    let children: Vec<_> = tree.child_tasks.iter().map(|t| t.node_id).collect();
    assert_eq!(
        children,
        vec![
            fx.f.graph.node(fx.first).id,
            fx.f.graph.node(fx.second).id,
            fx.f.graph.node(fx.sum).id,
        ]
    );
}

#[test]
fn test_independent_statements_produce_no_suggestions() {
    let mut f = GraphFixture::new();
    let main = f.func(0, "main", 1, 10);
    let a = f.cu(1, 2, 3, 5);
    let b = f.cu(2, 4, 5, 5);
    let c = f.cu(3, 6, 7, 5);
    f.children(main, &[a, b, c]);

    let result = run(&f, &DetectionConfig::default()).unwrap();
    assert!(result.suggestions.is_empty());
    assert!(result.regions.is_empty());
    assert_eq!(result.roles[&f.graph.node(main).id], MwType::Root);
    for n in [a, b, c] {
        assert_eq!(result.roles[&f.graph.node(n).id], MwType::Fork);
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let fx = fib();
    let first = run(&fx.f, &DetectionConfig::default()).unwrap();
    let second = run(&fx.f, &DetectionConfig::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_fixpoint_cap_surfaces_as_error() {
    let mut fx = fib();
    // a reader of a single task makes the first scan change something
    let reader = fx.f.cu(7, 60, 61, 5);
    fx.f.raw(reader, fx.first, "z", 60, 44);

    let config = DetectionConfig::default().max_fixpoint_iterations(1);
    let err = run(&fx.f, &config).unwrap_err();
    assert!(matches!(err, PatternError::FixpointNotConverged { iterations: 1 }));
}
