use std::path::PathBuf;

use taskdag::builder::TaskBuilder;
use taskdag::{Registry, TaskName, TaskRunner, TaskdagError};
use taskdag_test_utils::builders::{register_failing, register_graph, register_recording};
use taskdag_test_utils::init_tracing;
use taskdag_test_utils::spy::ExecutionSpy;

#[test]
fn test_diamond_runs_shared_dependency_once() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let mut registry = Registry::new();
    register_graph(
        &mut registry,
        &spy,
        &[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d"]),
            ("d", &[]),
        ],
    )
    .unwrap();

    TaskRunner::new(&registry, false)
        .run(&[TaskName::from("a")])
        .unwrap();

    assert_eq!(spy.count_of("d"), 1);
    spy.assert_ran_before("d", "b");
    spy.assert_ran_before("d", "c");
    spy.assert_ran_before("b", "a");
    spy.assert_ran_before("c", "a");
}

#[test]
fn test_multi_target_run_skips_unrelated_branch() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let mut registry = Registry::new();
    register_graph(
        &mut registry,
        &spy,
        &[
            ("a", &["b"]),
            ("b", &["d"]),
            ("d", &[]),
            ("g", &["d"]),
            ("h", &[]),
            ("i", &[]),
        ],
    )
    .unwrap();

    let targets: Vec<TaskName> = ["b", "g", "i", "h"].map(TaskName::from).into();
    TaskRunner::new(&registry, false).run(&targets).unwrap();

    assert_eq!(spy.count_of("d"), 1);
    assert_eq!(spy.count_of("a"), 0);
    assert_eq!(spy.names().len(), 5);
}

#[test]
fn test_failure_names_the_target_and_stops_the_run() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let mut registry = Registry::new();
    register_recording(&mut registry, &spy, "first", &[]).unwrap();
    register_failing(&mut registry, &spy, "boom", &["first"]).unwrap();
    register_recording(&mut registry, &spy, "after", &["boom"]).unwrap();

    let err = TaskRunner::new(&registry, false)
        .run(&[TaskName::from("after")])
        .unwrap_err();

    assert!(matches!(
        err,
        TaskdagError::TaskFailed { ref target, .. } if target == &TaskName::from("boom")
    ));
    assert_eq!(spy.names(), vec!["first", "boom"], "nothing runs after the failure");
}

#[test]
fn test_resolution_errors_abort_with_zero_side_effects() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let mut registry = Registry::new();
    register_recording(&mut registry, &spy, "a", &["ghost"]).unwrap();

    let err = TaskRunner::new(&registry, false)
        .run(&[TaskName::from("a")])
        .unwrap_err();
    assert!(matches!(err, TaskdagError::TargetNotFound(_)));
    assert!(spy.names().is_empty(), "no task may run when resolution fails");
}

#[test]
fn test_leaf_path_dependency_does_not_block_execution() {
    init_tracing();
    let spy = ExecutionSpy::new();
    let spy_in_task = spy.clone();
    let mut registry = Registry::new();
    let task = TaskBuilder::new("compile")
        .dependency(TaskName::from(PathBuf::from("/no/such/source.c")))
        .build(move |_args| {
            spy_in_task.record("compile");
            Ok(())
        });
    registry.register(task).unwrap();

    TaskRunner::new(&registry, false)
        .run(&[TaskName::from("compile")])
        .unwrap();
    assert_eq!(spy.names(), vec!["compile"]);
}
