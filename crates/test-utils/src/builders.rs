#![allow(dead_code)]

//! Helpers to set up task graphs for tests.

use std::sync::Arc;

use anyhow::bail;
use taskdag::builder::TaskBuilder;
use taskdag::{BuildDef, Registry, TaskName};

use crate::spy::ExecutionSpy;

/// Register a task that records its own name on the given spy.
pub fn register_recording(
    registry: &mut Registry,
    spy: &ExecutionSpy,
    name: &str,
    deps: &[&str],
) -> taskdag::Result<()> {
    let spy = spy.clone();
    let task_name = name.to_string();
    let task = TaskBuilder::new(name)
        .dependencies(deps.iter().map(|dep| TaskName::from(*dep)))
        .build(move |_args| {
            spy.record(task_name.clone());
            Ok(())
        });
    registry.register(task)
}

/// Register a task that records its own name and then fails.
pub fn register_failing(
    registry: &mut Registry,
    spy: &ExecutionSpy,
    name: &str,
    deps: &[&str],
) -> taskdag::Result<()> {
    let spy = spy.clone();
    let task_name = name.to_string();
    let task = TaskBuilder::new(name)
        .dependencies(deps.iter().map(|dep| TaskName::from(*dep)))
        .build(move |_args| {
            spy.record(task_name.clone());
            bail!("task {task_name} exploded")
        });
    registry.register(task)
}

/// Register a whole graph of recording tasks: `(name, dependencies)` pairs.
pub fn register_graph(
    registry: &mut Registry,
    spy: &ExecutionSpy,
    edges: &[(&str, &[&str])],
) -> taskdag::Result<()> {
    for (name, deps) in edges {
        register_recording(registry, spy, name, deps)?;
    }
    Ok(())
}

/// Build definition registering a graph of recording tasks, with an optional
/// set of tasks that fail after recording.
///
/// Suitable for the concurrent runner: every worker re-evaluates the
/// definition, and all resulting procedures share the same spy.
pub fn graph_build_def(
    edges: &[(&str, &[&str])],
    failing: &[&str],
    spy: &ExecutionSpy,
) -> BuildDef {
    let edges: Vec<(String, Vec<String>)> = edges
        .iter()
        .map(|(name, deps)| {
            (
                name.to_string(),
                deps.iter().map(|dep| dep.to_string()).collect(),
            )
        })
        .collect();
    let failing: Vec<String> = failing.iter().map(|name| name.to_string()).collect();
    let spy = spy.clone();

    Arc::new(move |_config, registry| {
        for (name, deps) in &edges {
            let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            if failing.contains(name) {
                register_failing(registry, &spy, name, &deps)?;
            } else {
                register_recording(registry, &spy, name, &deps)?;
            }
        }
        Ok(())
    })
}
