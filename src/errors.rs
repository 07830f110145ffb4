// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

use crate::task::TaskName;

#[derive(Error, Debug)]
pub enum TaskdagError {
    #[error("Task {0} already exists.")]
    DuplicateTask(TaskName),

    #[error("Configuration item {0} already exists.")]
    DuplicateConfigItem(String),

    #[error("There is no configuration item named {0}.")]
    UnknownConfigItem(String),

    #[error("Invalid value {value:?} for configuration item {name}: {reason}")]
    InvalidConfigValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Target {0} is not found.")]
    TargetNotFound(TaskName),

    #[error("Target {0} has circular dependency.")]
    CircularDependency(TaskName),

    #[error("Target {target} causes an error.")]
    TaskFailed {
        target: TaskName,
        #[source]
        source: anyhow::Error,
    },

    #[error("No target is specified.")]
    NoTargetSpecified,

    #[error("Worker pool disconnected before the run finished.")]
    WorkerDisconnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskdagError {
    /// Render the error together with its source chain, one cause per line.
    ///
    /// Workers report failures across a channel as plain result records, so
    /// they print the full detail locally through their print client.
    pub fn render_chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        out
    }
}

pub type Result<T> = std::result::Result<T, TaskdagError>;
