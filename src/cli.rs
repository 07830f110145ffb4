// src/cli.rs

//! CLI argument parsing and wiring using `clap`.
//!
//! The embedding binary supplies its build definition and calls [`run`]:
//!
//! - confirm configuration overrides (`name=value` words) into a `Config`,
//! - build the registry from the build definition,
//! - either list configuration items and tasks (`-t` / `-T`), or
//! - resolve targets (falling back to the registry's default task) and
//!   execute them sequentially, or concurrently when `--jobs` is 2 or more.

use std::collections::BTreeMap;

use clap::{Parser, ValueEnum};
use tracing::debug;

use crate::concurrent::ConcurrentTaskRunner;
use crate::config::ConfigRegistry;
use crate::errors::{Result, TaskdagError};
use crate::registry::Registry;
use crate::runner::TaskRunner;
use crate::task::{Task, TaskName};
use crate::{BuildDef, ConfigDef};

/// Command-line arguments for a taskdag-driven build tool.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskdag",
    version,
    about = "A make-like task runner with dependency-ordered execution.",
    long_about = None
)]
pub struct CliArgs {
    /// Show configuration items and described tasks, then exit.
    #[arg(short = 't', long)]
    pub tasks: bool,

    /// Show configuration items and all tasks (including ones without a
    /// description), then exit.
    #[arg(short = 'T', long)]
    pub all_tasks: bool,

    /// Execute tasks concurrently with N workers (takes effect from 2 up).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Show each task name as it starts running.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// `name=value` configuration overrides mixed with target task names.
    #[arg(value_name = "CONFIG|TARGET")]
    pub config_and_targets: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// High-level entry point for an embedding binary.
pub fn run(args: CliArgs, config_def: ConfigDef, build: BuildDef) -> Result<()> {
    let _ = crate::logging::init_logging(args.log_level);

    let (overrides, target_words) = split_config_and_targets(&args.config_and_targets);

    let mut config_registry = ConfigRegistry::new();
    (config_def)(&mut config_registry)?;
    let config = config_registry.confirm(&overrides)?;

    let mut registry = Registry::new();
    (build)(&config, &mut registry)?;

    if args.tasks || args.all_tasks {
        show_config_items(&config_registry);
        show_tasks(&registry, args.all_tasks);
        return Ok(());
    }

    let targets = resolve_targets(&registry, &target_words)?;
    debug!(?targets, jobs = ?args.jobs, "executing targets");

    match args.jobs {
        Some(n_workers) if n_workers >= 2 => {
            let mut runner =
                ConcurrentTaskRunner::create(build, config, n_workers, args.verbose)?;
            runner.run(&targets)
        }
        _ => TaskRunner::new(&registry, args.verbose).run(&targets),
    }
}

/// Split positional words into `name=value` overrides and target names.
fn split_config_and_targets(words: &[String]) -> (BTreeMap<String, String>, Vec<String>) {
    let mut overrides = BTreeMap::new();
    let mut targets = Vec::new();
    for word in words {
        match word.split_once('=') {
            Some((name, value)) => {
                overrides.insert(name.to_string(), value.to_string());
            }
            None => targets.push(word.clone()),
        }
    }
    (overrides, targets)
}

/// Map target words to registered task names.
///
/// A bare word is looked up as a symbolic name first, then retried as an
/// absolute path (file tasks are registered under absolute paths). With no
/// words at all, the registry's default task is used.
fn resolve_targets(registry: &Registry, target_words: &[String]) -> Result<Vec<TaskName>> {
    let words: Vec<String> = if target_words.is_empty() {
        let Some(default) = registry.default_task_name() else {
            return Err(TaskdagError::NoTargetSpecified);
        };
        vec![default.to_string()]
    } else {
        target_words.to_vec()
    };

    let mut targets = Vec::with_capacity(words.len());
    for word in words {
        let by_name = TaskName::Name(word.clone());
        if registry.find(&by_name).is_some() {
            targets.push(by_name);
            continue;
        }
        let by_path = TaskName::Path(std::path::absolute(&word)?);
        if registry.find(&by_path).is_some() {
            targets.push(by_path);
        } else {
            return Err(TaskdagError::TargetNotFound(by_name));
        }
    }
    Ok(targets)
}

fn show_config_items(config_registry: &ConfigRegistry) {
    println!("Configuration items:");

    let items = config_registry.get_all_items();
    if items.is_empty() {
        println!("  (None)");
        return;
    }

    let name_width = items.iter().map(|item| item.name.len()).max().unwrap_or(0) + 2;
    for item in items {
        println!(
            "  {:name_width$}# {} (default: {})",
            item.name, item.help, item.default
        );
    }
}

fn show_tasks(registry: &Registry, show_all: bool) {
    println!("Tasks:");

    let mut tasks = if show_all {
        registry.get_all()
    } else {
        registry.get_all_with_help()
    };

    // Described tasks first, then plain symbolic names, then paths.
    tasks.sort_by_key(|task| {
        let priority = if task.has_help() {
            0
        } else if task.name().is_path() {
            2
        } else {
            1
        };
        (priority, task.name().to_string())
    });

    let name_width = tasks
        .iter()
        .filter(|task| task.has_help())
        .map(|task| task.name().to_string().len())
        .max()
        .unwrap_or(0)
        + 2;

    for task in tasks {
        print_task_line(task, name_width);
    }
}

fn print_task_line(task: &Task, name_width: usize) {
    match task.help() {
        Some(help) => {
            println!("  {:name_width$}# {help}", task.name().to_string());
        }
        None if task.name().is_path() => println!("  (Path) {}", task.name()),
        None => println!("  {}", task.name()),
    }
}
