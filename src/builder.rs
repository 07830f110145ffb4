// src/builder.rs

//! Builders producing immutable [`Task`] records.
//!
//! Three kinds:
//! - [`TaskBuilder`]: wraps a procedure verbatim.
//! - [`FileTaskBuilder`]: wraps a procedure with a modification-time
//!   staleness check keyed on a target path.
//! - [`CleanTaskBuilder`]: produces a task deleting a bound list of paths.
//!
//! Builders are stateful during construction only; `build()` yields the task
//! and the builder is consumed.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Context;

use crate::task::{Task, TaskArg, TaskName, TaskProcedure};

/// Builder for a plain task.
pub struct TaskBuilder {
    name: String,
    args: Vec<TaskArg>,
    dependencies: Vec<TaskName>,
    help: Option<String>,
}

impl TaskBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            dependencies: Vec::new(),
            help: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<TaskArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = TaskArg>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn dependency(mut self, dep: impl Into<TaskName>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    pub fn dependencies(mut self, deps: impl IntoIterator<Item = TaskName>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn build<F>(self, procedure: F) -> Task
    where
        F: Fn(&[TaskArg]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Task {
            name: TaskName::Name(self.name),
            procedure: Arc::new(procedure),
            args: self.args,
            dependencies: self.dependencies,
            help: self.help,
        }
    }
}

/// Builder for a file-producing task gated on target freshness.
///
/// The built task wraps the given procedure with the staleness policy:
/// - target path missing: run;
/// - target path is a directory: never run (existence is enough);
/// - otherwise run iff some dependency that is an existing *file* path has a
///   strictly newer modification time than the target.
///
/// Directory dependencies are deliberately excluded from the timestamp
/// comparison; directory mtimes change on unrelated entry churn and carry no
/// freshness signal.
pub struct FileTaskBuilder {
    path: PathBuf,
    args: Vec<TaskArg>,
    dependencies: Vec<TaskName>,
}

impl FileTaskBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<TaskArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = TaskArg>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn dependency(mut self, dep: impl Into<TaskName>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    pub fn dependencies(mut self, deps: impl IntoIterator<Item = TaskName>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    pub fn build<F>(self, procedure: F) -> Task
    where
        F: Fn(&[TaskArg]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let path = self.path.clone();
        let dependencies = self.dependencies.clone();

        let gated: TaskProcedure = Arc::new(move |args: &[TaskArg]| {
            if !path.exists() {
                return procedure(args);
            }
            if path.is_dir() {
                return Ok(());
            }

            let target_mtime = modified_time(&path)?;
            for dep in &dependencies {
                let Some(dep_path) = dep.as_path() else {
                    continue;
                };
                if !dep_path.is_file() {
                    continue;
                }
                if modified_time(dep_path)? > target_mtime {
                    return procedure(args);
                }
            }
            Ok(())
        });

        Task {
            name: TaskName::Path(self.path),
            procedure: gated,
            args: self.args,
            dependencies: self.dependencies,
            help: None,
        }
    }
}

/// Builder for a task deleting generated files and directories.
pub struct CleanTaskBuilder {
    name: String,
    dependencies: Vec<TaskName>,
    help: Option<String>,
}

impl CleanTaskBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            help: None,
        }
    }

    pub fn dependency(mut self, dep: impl Into<TaskName>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    pub fn dependencies(mut self, deps: impl IntoIterator<Item = TaskName>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Finalize into a task that deletes each of `clean_paths` that exists.
    /// Already-absent paths are tolerated.
    pub fn build(self, clean_paths: Vec<PathBuf>) -> Task {
        let args = clean_paths.into_iter().map(TaskArg::Path).collect();

        let procedure: TaskProcedure = Arc::new(|args: &[TaskArg]| {
            for arg in args {
                let Some(path) = arg.as_path() else { continue };
                if path.is_file() {
                    fs::remove_file(path)
                        .with_context(|| format!("removing file {}", path.display()))?;
                } else if path.is_dir() {
                    fs::remove_dir_all(path)
                        .with_context(|| format!("removing directory {}", path.display()))?;
                }
            }
            Ok(())
        });

        Task {
            name: TaskName::Name(self.name),
            procedure,
            args,
            dependencies: self.dependencies,
            help: self.help,
        }
    }
}

fn modified_time(path: &std::path::Path) -> anyhow::Result<SystemTime> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("reading metadata of {}", path.display()))?;
    metadata
        .modified()
        .with_context(|| format!("reading modification time of {}", path.display()))
}
