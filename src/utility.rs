// src/utility.rs

//! Convenience wrappers over the builders for common task shapes.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::builder::{CleanTaskBuilder, FileTaskBuilder};
use crate::errors::Result;
use crate::registry::Registry;
use crate::task::{TaskArg, TaskName};

/// Register a task deleting the given paths (files unlinked, directories
/// removed recursively, absent paths tolerated).
pub fn clean(
    registry: &mut Registry,
    name: impl Into<String>,
    paths: Vec<PathBuf>,
    dependencies: Vec<TaskName>,
    help: Option<String>,
) -> Result<()> {
    let mut builder = CleanTaskBuilder::new(name).dependencies(dependencies);
    if let Some(help) = help {
        builder = builder.help(help);
    }
    registry.register(builder.build(paths))
}

/// Register a file-gated task creating a directory.
///
/// Once the directory exists the task never runs again; an existing
/// directory target is always considered fresh.
pub fn directory(
    registry: &mut Registry,
    path: PathBuf,
    dependencies: Vec<TaskName>,
) -> Result<()> {
    let task = FileTaskBuilder::new(path.clone())
        .arg(path)
        .dependencies(dependencies)
        .build(|args| {
            let dir = args
                .first()
                .and_then(TaskArg::as_path)
                .context("directory task is missing its path argument")?;
            fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))
        });
    registry.register(task)
}
