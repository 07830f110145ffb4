// src/dag/plan.rs

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::errors::{Result, TaskdagError};
use crate::registry::Registry;
use crate::task::TaskName;

/// Resolved execution plan for a set of targets.
///
/// One depth-first traversal produces everything both runners need:
/// - `order`: a dependency-correct linear order, each task exactly once;
/// - `pending`: per task, the number of immediate dependencies that will
///   eventually report a completion (leaf paths never will, so they are not
///   counted);
/// - `dependents`: reverse edges among planned tasks, used to decrement
///   pending counts when a completion arrives.
///
/// Duplicate entries in a dependency list are collapsed to a single edge, so
/// a completion decrements each dependent exactly once.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    order: Vec<TaskName>,
    pending: HashMap<TaskName, usize>,
    dependents: HashMap<TaskName, Vec<TaskName>>,
}

impl ExecutionPlan {
    /// Resolve `targets` against `registry`.
    ///
    /// Fails with [`TaskdagError::CircularDependency`] if a reachable task
    /// depends transitively on itself, and with
    /// [`TaskdagError::TargetNotFound`] if a symbolic name has no registered
    /// task. An unregistered *path* dependency is a leaf input and simply
    /// contributes nothing to the plan.
    pub fn resolve(registry: &Registry, targets: &[TaskName]) -> Result<Self> {
        let mut resolver = Resolver {
            registry,
            visited: HashSet::new(),
            added: HashSet::new(),
            plan: ExecutionPlan {
                order: Vec::new(),
                pending: HashMap::new(),
                dependents: HashMap::new(),
            },
        };

        for target in targets {
            resolver.visit(target)?;
        }

        debug!(tasks = resolver.plan.order.len(), "resolved execution plan");
        Ok(resolver.plan)
    }

    /// Planned tasks in dependency-correct order.
    pub fn order(&self) -> &[TaskName] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Pending-dependency counts for the concurrent dispatch loop.
    pub fn pending_counts(&self) -> HashMap<TaskName, usize> {
        self.pending.clone()
    }

    /// Planned tasks whose immediate dependency list contains `name`.
    pub fn dependents_of(&self, name: &TaskName) -> &[TaskName] {
        self.dependents
            .get(name)
            .map(|deps| deps.as_slice())
            .unwrap_or(&[])
    }
}

struct Resolver<'a> {
    registry: &'a Registry,
    /// Names on the current exploration path or already explored.
    visited: HashSet<TaskName>,
    /// Names fully resolved into the plan.
    added: HashSet<TaskName>,
    plan: ExecutionPlan,
}

impl Resolver<'_> {
    /// Visit one node. Returns whether the node is countable, i.e. resolves
    /// to a registered task that will report a completion of its own.
    fn visit(&mut self, target: &TaskName) -> Result<bool> {
        if self.visited.contains(target) {
            if self.added.contains(target) {
                // Already resolved via another branch (diamond sharing).
                return Ok(true);
            }
            return Err(TaskdagError::CircularDependency(target.clone()));
        }

        let Some(task) = self.registry.find(target) else {
            if target.is_path() {
                // A path dependency need not be produced by a task.
                return Ok(false);
            }
            return Err(TaskdagError::TargetNotFound(target.clone()));
        };
        let dependencies = task.dependencies().to_vec();

        self.visited.insert(target.clone());

        let mut count = 0;
        let mut seen: HashSet<&TaskName> = HashSet::new();
        for dep in &dependencies {
            if !seen.insert(dep) {
                continue;
            }
            if self.visit(dep)? {
                count += 1;
                self.plan
                    .dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(target.clone());
            }
        }

        self.plan.pending.insert(target.clone(), count);
        self.plan.order.push(target.clone());
        self.added.insert(target.clone());
        Ok(true)
    }
}
