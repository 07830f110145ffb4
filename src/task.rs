// src/task.rs

//! The task data model: names, bound arguments and the immutable task record.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifier of a task: either a symbolic name or a filesystem path.
///
/// Both forms are used as registry keys and as dependency-edge endpoints.
/// A path used as a dependency does not have to be produced by a task; an
/// unregistered path is treated as an always-satisfied leaf input, while an
/// unregistered symbolic name is an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskName {
    Name(String),
    Path(PathBuf),
}

impl TaskName {
    /// Whether this identifier is a filesystem path.
    pub fn is_path(&self) -> bool {
        matches!(self, TaskName::Path(_))
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            TaskName::Path(p) => Some(p),
            TaskName::Name(_) => None,
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskName::Name(name) => write!(f, "{name}"),
            TaskName::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for TaskName {
    fn from(name: &str) -> Self {
        TaskName::Name(name.to_string())
    }
}

impl From<String> for TaskName {
    fn from(name: String) -> Self {
        TaskName::Name(name)
    }
}

impl From<PathBuf> for TaskName {
    fn from(path: PathBuf) -> Self {
        TaskName::Path(path)
    }
}

impl From<&Path> for TaskName {
    fn from(path: &Path) -> Self {
        TaskName::Path(path.to_path_buf())
    }
}

/// A value bound to a task at build time and handed to its procedure on run.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskArg {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(PathBuf),
}

impl TaskArg {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            TaskArg::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TaskArg::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for TaskArg {
    fn from(s: &str) -> Self {
        TaskArg::Str(s.to_string())
    }
}

impl From<PathBuf> for TaskArg {
    fn from(p: PathBuf) -> Self {
        TaskArg::Path(p)
    }
}

/// Executable body of a task.
///
/// Shared behind an `Arc` so a task can be cloned into per-run bookkeeping
/// without re-allocating the closure.
pub type TaskProcedure = Arc<dyn Fn(&[TaskArg]) -> anyhow::Result<()> + Send + Sync>;

/// An immutable named unit of work.
///
/// Built by one of the builders in [`crate::builder`] and owned by the
/// [`crate::registry::Registry`] after registration.
#[derive(Clone)]
pub struct Task {
    pub(crate) name: TaskName,
    pub(crate) procedure: TaskProcedure,
    pub(crate) args: Vec<TaskArg>,
    pub(crate) dependencies: Vec<TaskName>,
    pub(crate) help: Option<String>,
}

impl Task {
    pub fn name(&self) -> &TaskName {
        &self.name
    }

    pub fn args(&self) -> &[TaskArg] {
        &self.args
    }

    pub fn dependencies(&self) -> &[TaskName] {
        &self.dependencies
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn has_help(&self) -> bool {
        self.help.is_some()
    }

    /// Execute the task procedure with its bound arguments.
    pub fn run(&self) -> anyhow::Result<()> {
        (self.procedure)(&self.args)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("dependencies", &self.dependencies)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}
