// src/concurrent/worker.rs

//! Long-lived task worker.
//!
//! A worker pulls run-requests from the shared request queue, executes them
//! against its own registry and pushes an [`ExecutionResult`] per request to
//! the completion channel. The registry is rebuilt unconditionally at thread
//! start by re-running the build definition with the confirmed
//! configuration; task records are never shared between workers.

use std::sync::mpsc;
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::BuildDef;
use crate::concurrent::printer::PrintClient;
use crate::concurrent::queue::SharedQueue;
use crate::config::Config;
use crate::errors::{Result, TaskdagError};
use crate::registry::Registry;
use crate::task::TaskName;

/// Command flowing from the dispatcher to the worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Run(TaskName),
    /// Stop one worker. All workers share the request queue and only one of
    /// them can consume a given message, so a worker that dequeues Exit
    /// re-pushes an identical Exit before terminating; the sentinel stays
    /// available for the next worker being stopped.
    Exit,
}

/// Outcome of one run-request, reported back to the dispatcher.
#[derive(Debug)]
pub struct ExecutionResult {
    pub target: TaskName,
    pub error: Option<TaskdagError>,
}

impl ExecutionResult {
    pub fn success(target: TaskName) -> Self {
        Self {
            target,
            error: None,
        }
    }

    pub fn failure(target: TaskName, error: TaskdagError) -> Self {
        Self {
            target,
            error: Some(error),
        }
    }
}

/// Handle owning one worker thread.
pub struct TaskWorker {
    build: BuildDef,
    config: Config,
    print_client: PrintClient,
    requests: SharedQueue<TaskCommand>,
    completions: mpsc::Sender<ExecutionResult>,
    verbose: bool,
    handle: Option<JoinHandle<()>>,
}

impl TaskWorker {
    pub fn new(
        build: BuildDef,
        config: Config,
        print_client: PrintClient,
        requests: SharedQueue<TaskCommand>,
        completions: mpsc::Sender<ExecutionResult>,
        verbose: bool,
    ) -> Self {
        Self {
            build,
            config,
            print_client,
            requests,
            completions,
            verbose,
            handle: None,
        }
    }

    /// Start the worker thread. Starting twice is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        let build = self.build.clone();
        let config = self.config.clone();
        let print_client = self.print_client.clone();
        let requests = self.requests.clone();
        let completions = self.completions.clone();
        let verbose = self.verbose;

        let handle = std::thread::Builder::new()
            .name(print_client.name().to_string())
            .spawn(move || {
                worker_main(build, config, print_client, requests, completions, verbose);
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the worker: push one Exit sentinel, then join exactly one
    /// thread. Which worker consumes the sentinel does not matter; the
    /// re-broadcast keeps one queued until every worker has exited.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.requests.push(TaskCommand::Exit);
        if handle.join().is_err() {
            warn!("task worker thread panicked");
        }
    }
}

fn worker_main(
    build: BuildDef,
    config: Config,
    print_client: PrintClient,
    requests: SharedQueue<TaskCommand>,
    completions: mpsc::Sender<ExecutionResult>,
    verbose: bool,
) {
    // This thread did not inherit the task objects of the controlling
    // thread; rebuild its own registry from the build definition.
    let mut registry = Registry::new();
    let registry = match (build)(&config, &mut registry) {
        Ok(()) => Some(registry),
        Err(e) => {
            // Keep serving the command loop and fail each request instead,
            // so the dispatcher aborts promptly rather than waiting forever
            // for a completion.
            print_client.print(format!("failed to build task registry: {e}"));
            warn!(worker = print_client.name(), error = %e, "registry rebuild failed");
            None
        }
    };

    debug!(worker = print_client.name(), "task worker started");

    loop {
        match requests.pop() {
            TaskCommand::Exit => {
                // Spread the exit command to the other workers before
                // exiting, because it may be intended for them.
                requests.push(TaskCommand::Exit);
                debug!(worker = print_client.name(), "task worker exiting");
                return;
            }
            TaskCommand::Run(target) => {
                let result = match &registry {
                    Some(registry) => {
                        execute_target(registry, target, &print_client, verbose)
                    }
                    None => ExecutionResult::failure(
                        target.clone(),
                        TaskdagError::Other(anyhow::anyhow!(
                            "worker {} has no registry; build definition failed",
                            print_client.name()
                        )),
                    ),
                };
                if completions.send(result).is_err() {
                    // Dispatcher is gone; nothing left to report to.
                    return;
                }
            }
        }
    }
}

fn execute_target(
    registry: &Registry,
    target: TaskName,
    print_client: &PrintClient,
    verbose: bool,
) -> ExecutionResult {
    let Some(task) = registry.find(&target) else {
        if target.is_path() {
            // A path dependency need not be produced by a task.
            return ExecutionResult::success(target);
        }
        let error = TaskdagError::TargetNotFound(target.clone());
        print_client.print(error.render_chain());
        return ExecutionResult::failure(target, error);
    };

    if verbose {
        print_client.print(format!("[Task] {}", task.name()));
    }
    debug!(task = %target, "running task");

    match task.run() {
        Ok(()) => ExecutionResult::success(target),
        Err(source) => {
            let error = TaskdagError::TaskFailed {
                target: target.clone(),
                source,
            };
            // The structured cause chain stays on this side of the channel;
            // print it where it is still intact.
            print_client.print(error.render_chain());
            ExecutionResult::failure(target, error)
        }
    }
}
