// src/runner.rs

//! In-process sequential task runner.

use tracing::{debug, warn};

use crate::dag::ExecutionPlan;
use crate::errors::{Result, TaskdagError};
use crate::registry::Registry;
use crate::task::TaskName;

/// Executes targets one at a time, dependencies first.
///
/// Resolution errors (cycles, unknown symbolic names) abort before any task
/// runs; the first procedure error stops the run immediately.
pub struct TaskRunner<'a> {
    registry: &'a Registry,
    verbose: bool,
}

impl<'a> TaskRunner<'a> {
    pub fn new(registry: &'a Registry, verbose: bool) -> Self {
        Self { registry, verbose }
    }

    /// Execute the targets with their dependencies, each task at most once.
    pub fn run(&self, targets: &[TaskName]) -> Result<()> {
        let plan = ExecutionPlan::resolve(self.registry, targets)?;

        for name in plan.order() {
            let Some(task) = self.registry.find(name) else {
                // Plan entries always come from the registry.
                warn!(task = %name, "planned task missing from registry; skipping");
                continue;
            };

            if self.verbose {
                println!("[Task] {name}");
            }
            debug!(task = %name, "running task");

            task.run().map_err(|source| TaskdagError::TaskFailed {
                target: name.clone(),
                source,
            })?;
        }

        Ok(())
    }
}
