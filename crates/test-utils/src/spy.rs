//! Thread-safe recorder of task executions.

use std::sync::{Arc, Mutex};

/// Records the names of executed tasks in completion order.
///
/// Clones share the same underlying log, so a spy captured by procedures in
/// several worker registries still yields one combined record.
#[derive(Debug, Clone, Default)]
pub struct ExecutionSpy {
    log: Arc<Mutex<Vec<String>>>,
}

impl ExecutionSpy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: impl Into<String>) {
        self.log.lock().unwrap().push(name.into());
    }

    /// Recorded names, in the order the executions finished.
    pub fn names(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names().iter().position(|n| n == name)
    }

    pub fn count_of(&self, name: &str) -> usize {
        self.names().iter().filter(|n| *n == name).count()
    }

    /// Assert that `before` was recorded and finished earlier than `after`.
    pub fn assert_ran_before(&self, before: &str, after: &str) {
        let names = self.names();
        let b = names
            .iter()
            .position(|n| n == before)
            .unwrap_or_else(|| panic!("{before} was not executed: {names:?}"));
        let a = names
            .iter()
            .position(|n| n == after)
            .unwrap_or_else(|| panic!("{after} was not executed: {names:?}"));
        assert!(b < a, "{before} should run before {after}: {names:?}");
    }
}
