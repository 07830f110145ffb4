// src/dag/mod.rs

//! Dependency-graph resolution.
//!
//! The graph is implicit in each task's dependency list; resolution walks it
//! depth-first from the requested targets and produces an [`ExecutionPlan`]
//! shared by both runners. Cycle and not-found errors surface here, before
//! any task runs.

pub mod plan;

pub use plan::ExecutionPlan;
