// src/concurrent/mod.rs

//! Concurrent execution engine.
//!
//! A fixed pool of worker threads shares one request queue and one
//! completion channel. The dispatcher pushes a run-request for every task
//! whose pending-dependency count reaches zero, blocks for the next
//! completion, and decrements dependents as completions arrive. Workers are
//! stopped with a self-propagating Exit sentinel: since any worker may
//! consume any queued message, a worker that dequeues Exit re-pushes it
//! before terminating so the next worker receives one too.
//!
//! Worker output is serialized through the print aggregator in [`printer`];
//! workers never write to the shared stream directly.

pub mod printer;
pub mod queue;
pub mod runner;
pub mod worker;

pub use printer::{PrintAggregator, PrintClient, PrintCommand};
pub use queue::SharedQueue;
pub use runner::ConcurrentTaskRunner;
pub use worker::{ExecutionResult, TaskCommand, TaskWorker};
