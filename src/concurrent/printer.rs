// src/concurrent/printer.rs

//! Output serialization for worker threads.
//!
//! Each worker holds a named [`PrintClient`] and sends its lines as
//! [`PrintCommand`]s over a channel instead of writing to the shared stream
//! directly, avoiding torn interleaved writes. A single [`PrintAggregator`]
//! thread consumes the channel in arrival order and writes
//! `[client] message` lines to the real sink.

use std::io::Write;
use std::sync::mpsc;
use std::thread::JoinHandle;

use tracing::{debug, warn};

/// Command flowing from clients to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintCommand {
    Message { client: String, message: String },
    /// Stop the aggregator. There is exactly one consumer, so no
    /// re-broadcast is needed.
    Exit,
}

/// Named handle a worker uses to emit output.
#[derive(Debug, Clone)]
pub struct PrintClient {
    name: String,
    tx: mpsc::Sender<PrintCommand>,
}

impl PrintClient {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue one line of output. Dropped silently if the aggregator is gone.
    pub fn print(&self, message: impl Into<String>) {
        let command = PrintCommand::Message {
            client: self.name.clone(),
            message: message.into(),
        };
        if self.tx.send(command).is_err() {
            warn!(client = %self.name, "print aggregator is gone; dropping output");
        }
    }
}

/// Single consumer turning queued print commands into ordered output.
pub struct PrintAggregator {
    tx: mpsc::Sender<PrintCommand>,
    rx: Option<mpsc::Receiver<PrintCommand>>,
    sink: Option<Box<dyn Write + Send>>,
    handle: Option<JoinHandle<()>>,
}

impl PrintAggregator {
    /// Aggregator writing to stdout.
    pub fn new() -> Self {
        Self::with_sink(Box::new(std::io::stdout()))
    }

    /// Aggregator writing to an arbitrary sink; used by tests to capture
    /// output.
    pub fn with_sink(sink: Box<dyn Write + Send>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx: Some(rx),
            sink: Some(sink),
            handle: None,
        }
    }

    /// Create a client. `name` must be non-empty; it prefixes every line the
    /// client emits.
    pub fn create_client(&self, name: impl Into<String>) -> PrintClient {
        let name = name.into();
        debug_assert!(!name.is_empty(), "print client name must be non-empty");
        PrintClient {
            name,
            tx: self.tx.clone(),
        }
    }

    /// Start the aggregator thread. Starting twice is a no-op.
    pub fn start(&mut self) -> std::io::Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let (Some(rx), Some(mut sink)) = (self.rx.take(), self.sink.take()) else {
            // Already consumed by a previous start/stop cycle.
            return Ok(());
        };

        let handle = std::thread::Builder::new()
            .name("print-aggregator".to_string())
            .spawn(move || {
                while let Ok(command) = rx.recv() {
                    match command {
                        PrintCommand::Exit => break,
                        PrintCommand::Message { client, message } => {
                            if let Err(e) = writeln!(sink, "[{client}] {message}") {
                                warn!(error = %e, "failed to write aggregated output");
                            }
                        }
                    }
                }
                let _ = sink.flush();
                debug!("print aggregator stopped");
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the aggregator: push one Exit sentinel, then join the thread.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.tx.send(PrintCommand::Exit);
        if handle.join().is_err() {
            warn!("print aggregator thread panicked");
        }
    }
}

impl Default for PrintAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PrintAggregator {
    fn drop(&mut self) {
        self.stop();
    }
}
