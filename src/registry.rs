// src/registry.rs

//! The task registry: a catalog of tasks keyed by name.
//!
//! A `Registry` is explicitly constructed and explicitly passed to the
//! runners. There is no process-wide instance; in the concurrent engine each
//! worker builds its own registry by re-running the build definition, so task
//! records never cross worker boundaries.

use std::collections::HashMap;

use crate::errors::{Result, TaskdagError};
use crate::task::{Task, TaskName};

#[derive(Debug, Default)]
pub struct Registry {
    tasks: HashMap<TaskName, Task>,
    default_task_name: Option<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Registering the same name twice is a fatal
    /// configuration error, detected eagerly.
    pub fn register(&mut self, task: Task) -> Result<()> {
        let name = task.name().clone();
        if self.tasks.contains_key(&name) {
            return Err(TaskdagError::DuplicateTask(name));
        }
        self.tasks.insert(name, task);
        Ok(())
    }

    pub fn find(&self, name: &TaskName) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn get_all(&self) -> Vec<&Task> {
        self.tasks.values().collect()
    }

    /// Tasks that carry a description.
    pub fn get_all_with_help(&self) -> Vec<&Task> {
        self.tasks.values().filter(|task| task.has_help()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task run when no target is specified.
    pub fn default_task_name(&self) -> Option<&str> {
        self.default_task_name.as_deref()
    }

    pub fn set_default_task_name(&mut self, name: impl Into<String>) {
        self.default_task_name = Some(name.into());
    }
}
