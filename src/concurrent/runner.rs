// src/concurrent/runner.rs

//! Dependency-count dispatch over a fixed worker pool.

use std::io::Write;
use std::sync::mpsc;

use tracing::{debug, info, warn};

use crate::BuildDef;
use crate::concurrent::printer::PrintAggregator;
use crate::concurrent::queue::SharedQueue;
use crate::concurrent::worker::{ExecutionResult, TaskCommand, TaskWorker};
use crate::config::Config;
use crate::dag::ExecutionPlan;
use crate::errors::{Result, TaskdagError};
use crate::registry::Registry;
use crate::task::TaskName;

/// Executes targets across a fixed pool of worker threads while preserving
/// dependency ordering.
///
/// The dispatcher is single-threaded and drives the pool through two queues:
/// run-requests go out on a shared request queue any idle worker may consume,
/// completions come back on a single completion channel. A task is dispatched
/// once its pending count (the number of its immediate dependencies that
/// resolve to real tasks) reaches zero.
pub struct ConcurrentTaskRunner {
    registry: Registry,
    build: BuildDef,
    config: Config,
    n_workers: usize,
    verbose: bool,
    sink: Option<Box<dyn Write + Send>>,
}

impl ConcurrentTaskRunner {
    /// Create a runner with `n_workers` workers.
    ///
    /// The controller keeps its own registry, built here from the build
    /// definition, for graph resolution; each worker later rebuilds its own.
    pub fn create(
        build: BuildDef,
        config: Config,
        n_workers: usize,
        verbose: bool,
    ) -> Result<Self> {
        let mut registry = Registry::new();
        (build)(&config, &mut registry)?;

        Ok(Self {
            registry,
            build,
            config,
            n_workers: n_workers.max(1),
            verbose,
            sink: None,
        })
    }

    /// Redirect aggregated worker output to `sink` instead of stdout.
    pub fn with_output_sink(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Execute the targets with their dependencies, each task at most once.
    ///
    /// Resolution errors abort before any worker starts. The first failure
    /// reported by a worker stops dispatch; workers and the print aggregator
    /// are then shut down in order before the error is returned.
    pub fn run(&mut self, targets: &[TaskName]) -> Result<()> {
        let plan = ExecutionPlan::resolve(&self.registry, targets)?;

        let mut aggregator = match self.sink.take() {
            Some(sink) => PrintAggregator::with_sink(sink),
            None => PrintAggregator::new(),
        };
        aggregator.start()?;

        let requests: SharedQueue<TaskCommand> = SharedQueue::new();
        let (completion_tx, completion_rx) = mpsc::channel::<ExecutionResult>();

        let mut workers = Vec::with_capacity(self.n_workers);
        for i in 0..self.n_workers {
            let client = aggregator.create_client(format!("Worker{i}"));
            let mut worker = TaskWorker::new(
                self.build.clone(),
                self.config.clone(),
                client,
                requests.clone(),
                completion_tx.clone(),
                self.verbose,
            );
            worker.start()?;
            workers.push(worker);
        }
        info!(workers = self.n_workers, tasks = plan.len(), "worker pool started");

        let outcome = dispatch(&plan, &requests, &completion_rx);

        // Shutdown always runs, success or failure: drain stale
        // run-requests first so a worker about to be stopped does not pick
        // one up, then stop workers one at a time, then the aggregator.
        let mut drained = 0;
        while requests.try_pop().is_some() {
            drained += 1;
        }
        if drained > 0 {
            debug!(drained, "discarded undispatched run-requests during shutdown");
        }
        for worker in &mut workers {
            worker.stop();
        }
        aggregator.stop();

        outcome
    }
}

/// The dispatch loop: push every zero-count task, block for one completion,
/// decrement its dependents, repeat until nothing is pending.
fn dispatch(
    plan: &ExecutionPlan,
    requests: &SharedQueue<TaskCommand>,
    completions: &mpsc::Receiver<ExecutionResult>,
) -> Result<()> {
    let mut pending = plan.pending_counts();
    let mut n_rest_tasks = pending.len();

    while n_rest_tasks > 0 {
        // Request all currently unblocked tasks. Excess ready work queues up
        // until a worker becomes free; no worker is addressed specifically.
        let ready: Vec<TaskName> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| name.clone())
            .collect();
        for name in ready {
            pending.remove(&name);
            debug!(task = %name, "dispatching task");
            requests.push(TaskCommand::Run(name));
        }

        // Wait for the next completion, in arrival order across branches.
        let result = completions
            .recv()
            .map_err(|_| TaskdagError::WorkerDisconnected)?;

        if let Some(error) = result.error {
            warn!(task = %result.target, "task failed; aborting run");
            return Err(error);
        }

        n_rest_tasks -= 1;
        for dependent in plan.dependents_of(&result.target) {
            // One completion decrements each dependent exactly once;
            // duplicate dependency entries were collapsed at plan time.
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
            }
        }
    }

    Ok(())
}
