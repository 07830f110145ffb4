// src/lib.rs

//! A make-like build/task orchestrator.
//!
//! Tasks are named units of work with explicit dependency edges; the engine
//! resolves the dependency graph and executes exactly the necessary, stale
//! work, in-process sequentially ([`runner::TaskRunner`]) or fanned out
//! across a fixed pool of worker threads
//! ([`concurrent::ConcurrentTaskRunner`]) while preserving dependency
//! ordering.
//!
//! The build definition is ordinary Rust: a [`BuildDef`] closure populates a
//! [`Registry`] with tasks produced by the builders in [`builder`]. The
//! concurrent engine re-evaluates the same closure once per worker, so task
//! records never cross worker boundaries.

pub mod builder;
pub mod cli;
pub mod concurrent;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod runner;
pub mod task;
pub mod utility;

use std::sync::Arc;

pub use crate::concurrent::ConcurrentTaskRunner;
pub use crate::errors::{Result, TaskdagError};
pub use crate::registry::Registry;
pub use crate::runner::TaskRunner;
pub use crate::task::{Task, TaskArg, TaskName};

use crate::config::{Config, ConfigRegistry};

/// Declares configuration items before any values are confirmed.
pub type ConfigDef = Arc<dyn Fn(&mut ConfigRegistry) -> Result<()> + Send + Sync>;

/// The build definition: populates a registry from a confirmed
/// configuration.
///
/// Shareable across worker threads and re-evaluated once per worker; the
/// declarative definition is the only thing workers have in common.
pub type BuildDef = Arc<dyn Fn(&Config, &mut Registry) -> Result<()> + Send + Sync>;
