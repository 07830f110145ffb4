use std::path::PathBuf;
use std::sync::Arc;

use taskdag::concurrent::ConcurrentTaskRunner;
use taskdag::config::Config;
use taskdag::{TaskName, TaskdagError};
use taskdag_test_utils::builders::graph_build_def;
use taskdag_test_utils::init_tracing;
use taskdag_test_utils::sink::SharedSink;
use taskdag_test_utils::spy::ExecutionSpy;

fn runner(
    edges: &[(&str, &[&str])],
    failing: &[&str],
    spy: &ExecutionSpy,
    n_workers: usize,
    verbose: bool,
) -> (ConcurrentTaskRunner, SharedSink) {
    let sink = SharedSink::new();
    let runner = ConcurrentTaskRunner::create(
        graph_build_def(edges, failing, spy),
        Config::default(),
        n_workers,
        verbose,
    )
    .unwrap()
    .with_output_sink(Box::new(sink.clone()));
    (runner, sink)
}

const DIAMOND: &[(&str, &[&str])] = &[
    ("a", &["b", "c"]),
    ("b", &["d"]),
    ("c", &["d"]),
    ("d", &[]),
];

#[test]
fn test_diamond_with_worker_pool_preserves_partial_order() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let (mut pool, _sink) = runner(DIAMOND, &[], &spy, 3, false);

    pool.run(&[TaskName::from("a")]).unwrap();

    assert_eq!(spy.names().len(), 4);
    assert_eq!(spy.count_of("d"), 1, "shared dependency must run exactly once");
    spy.assert_ran_before("d", "b");
    spy.assert_ran_before("d", "c");
    spy.assert_ran_before("b", "a");
    spy.assert_ran_before("c", "a");
}

#[test]
fn test_single_worker_pool_matches_sequential_semantics() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let (mut pool, _sink) = runner(DIAMOND, &[], &spy, 1, false);

    pool.run(&[TaskName::from("a")]).unwrap();

    let mut executed = spy.names();
    executed.sort();
    assert_eq!(executed, vec!["a", "b", "c", "d"]);
    spy.assert_ran_before("d", "b");
    spy.assert_ran_before("b", "a");
}

#[test]
fn test_multi_target_run_executes_shared_dependency_once() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let edges: &[(&str, &[&str])] = &[
        ("a", &["b"]),
        ("b", &["d"]),
        ("d", &[]),
        ("g", &["d"]),
        ("h", &[]),
        ("i", &[]),
    ];
    let (mut pool, _sink) = runner(edges, &[], &spy, 4, false);

    let targets: Vec<TaskName> = ["b", "g", "i", "h"].map(TaskName::from).into();
    pool.run(&targets).unwrap();

    assert_eq!(spy.names().len(), 5);
    assert_eq!(spy.count_of("d"), 1);
    assert_eq!(spy.count_of("a"), 0, "unrelated branch must not run");
}

#[test]
fn test_worker_failure_aborts_the_run_and_names_the_target() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let edges: &[(&str, &[&str])] =
        &[("after", &["boom"]), ("boom", &["first"]), ("first", &[])];
    let (mut pool, sink) = runner(edges, &["boom"], &spy, 2, false);

    let err = pool.run(&[TaskName::from("after")]).unwrap_err();

    assert!(matches!(
        err,
        TaskdagError::TaskFailed { ref target, .. } if target == &TaskName::from("boom")
    ));
    assert_eq!(spy.count_of("after"), 0, "dependents of a failed task must not run");
    // The failure detail is printed through the aggregator by the worker.
    assert!(
        sink.contents().contains("boom"),
        "aggregated output should carry the failure: {:?}",
        sink.contents()
    );
}

#[test]
fn test_cycle_is_raised_before_any_worker_runs() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let edges: &[(&str, &[&str])] = &[("a", &["b"]), ("b", &["a"])];
    let (mut pool, _sink) = runner(edges, &[], &spy, 2, false);

    let err = pool.run(&[TaskName::from("a")]).unwrap_err();
    assert!(matches!(err, TaskdagError::CircularDependency(_)));
    assert!(spy.names().is_empty());
}

#[test]
fn test_unknown_target_is_raised_before_any_worker_runs() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let edges: &[(&str, &[&str])] = &[("a", &[])];
    let (mut pool, _sink) = runner(edges, &[], &spy, 2, false);

    let err = pool.run(&[TaskName::from("ghost")]).unwrap_err();
    assert!(matches!(err, TaskdagError::TargetNotFound(_)));
    assert!(spy.names().is_empty());
}

#[test]
fn test_duplicate_dependency_entries_do_not_block_dispatch() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let edges: &[(&str, &[&str])] = &[("top", &["base", "base"]), ("base", &[])];
    let (mut pool, _sink) = runner(edges, &[], &spy, 2, false);

    // One completion from "base" must unblock "top"; a double-counted edge
    // would leave it pending forever.
    pool.run(&[TaskName::from("top")]).unwrap();

    assert_eq!(spy.count_of("base"), 1);
    assert_eq!(spy.count_of("top"), 1);
    spy.assert_ran_before("base", "top");
}

#[test]
fn test_failure_with_queued_ready_work_still_shuts_down() {
    init_tracing();
    let spy = ExecutionSpy::new();
    // Five independent ready tasks are pushed at once onto two workers, so
    // run-requests are still queued when the failure arrives.
    let edges: &[(&str, &[&str])] = &[
        ("boom", &[]),
        ("w1", &[]),
        ("w2", &[]),
        ("w3", &[]),
        ("w4", &[]),
    ];
    let (mut pool, _sink) = runner(edges, &["boom"], &spy, 2, false);

    let targets: Vec<TaskName> = ["boom", "w1", "w2", "w3", "w4"].map(TaskName::from).into();
    let err = pool.run(&targets).unwrap_err();

    assert!(matches!(
        err,
        TaskdagError::TaskFailed { ref target, .. } if target == &TaskName::from("boom")
    ));
}

#[test]
fn test_wide_pool_stops_every_worker_after_a_small_run() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let edges: &[(&str, &[&str])] = &[("solo", &[])];
    let (mut pool, _sink) = runner(edges, &[], &spy, 8, false);

    // Returning at all proves the exit sentinel reached all eight workers;
    // a lost sentinel would leave a join hanging.
    pool.run(&[TaskName::from("solo")]).unwrap();
    assert_eq!(spy.names(), vec!["solo"]);
}

#[test]
fn test_leaf_path_dependency_is_always_satisfied() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let spy_in_def = spy.clone();

    let build: taskdag::BuildDef = Arc::new(move |_config, registry| {
        let spy = spy_in_def.clone();
        let task = taskdag::builder::TaskBuilder::new("compile")
            .dependency(TaskName::from(PathBuf::from("/no/such/source.c")))
            .build(move |_args| {
                spy.record("compile");
                Ok(())
            });
        registry.register(task)
    });

    let sink = SharedSink::new();
    let mut pool = ConcurrentTaskRunner::create(build, Config::default(), 2, false)
        .unwrap()
        .with_output_sink(Box::new(sink));

    pool.run(&[TaskName::from("compile")]).unwrap();
    assert_eq!(spy.names(), vec!["compile"]);
}

#[test]
fn test_verbose_mode_routes_task_lines_through_the_aggregator() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let edges: &[(&str, &[&str])] = &[("greet", &[])];
    let (mut pool, sink) = runner(edges, &[], &spy, 2, true);

    pool.run(&[TaskName::from("greet")]).unwrap();

    let lines = sink.lines();
    assert!(
        lines
            .iter()
            .any(|line| line.starts_with("[Worker") && line.ends_with("[Task] greet")),
        "expected an aggregated verbose line, got {lines:?}"
    );
}

#[test]
fn test_repeated_runs_reuse_the_runner() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let (mut pool, _sink) = runner(DIAMOND, &[], &spy, 2, false);

    pool.run(&[TaskName::from("d")]).unwrap();
    assert_eq!(spy.names(), vec!["d"]);
}
