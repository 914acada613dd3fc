//! The conversion runner.
//!
//! Consumes a queue snapshot strictly in order, one file at a time, and
//! reports progress as [`RunEvent`]s. A failed item never stops the run;
//! every run ends with exactly one [`RunEvent::Completed`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use officepdf_core::{ItemFailure, RunEvent, RunId, RunSummary};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::converter::{Converter, ItemOutcome};

/// Everything a run needs, captured when it starts.
#[derive(Debug, Clone)]
pub struct RunJob {
    pub run_id: RunId,
    pub files: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

impl RunJob {
    pub fn new(files: Vec<PathBuf>, output_dir: PathBuf) -> Self {
        Self {
            run_id: RunId::new(),
            files,
            output_dir,
        }
    }
}

/// Handle to a run executing on its background worker.
#[derive(Debug)]
pub struct RunHandle {
    pub run_id: RunId,
    /// Events in the order the worker produced them.
    pub events: mpsc::UnboundedReceiver<RunEvent>,
    /// Resolves to the same summary carried by the completion event.
    pub worker: JoinHandle<RunSummary>,
}

/// Runs conversions through a [`Converter`].
#[derive(Clone)]
pub struct ConversionRunner {
    converter: Arc<dyn Converter>,
}

impl ConversionRunner {
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        Self { converter }
    }

    /// Start `job` on a fresh background task and return its event stream.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, job: RunJob) -> RunHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let run_id = job.run_id;
        let runner = self.clone();

        let worker = tokio::spawn(async move { runner.run(job, &tx).await });

        RunHandle {
            run_id,
            events: rx,
            worker,
        }
    }

    /// Execute `job` to completion, posting events to `events`.
    pub async fn run(&self, job: RunJob, events: &mpsc::UnboundedSender<RunEvent>) -> RunSummary {
        let RunJob {
            run_id,
            files,
            output_dir,
        } = job;
        let total = files.len();
        let started_at = Utc::now();

        info!(
            %run_id,
            converter = self.converter.name(),
            "Starting conversion of {} files into {}",
            total,
            output_dir.display()
        );
        post(
            events,
            RunEvent::RunStarted {
                run_id,
                total,
                output_dir: output_dir.clone(),
            },
        );

        let mut succeeded = 0;
        let mut failures = Vec::new();

        for (index, file) in files.iter().enumerate() {
            let name = file_name(file);
            debug!(%run_id, "Converting {}/{}: {}", index + 1, total, name);
            post(
                events,
                RunEvent::ItemStarted {
                    run_id,
                    index,
                    total,
                    name: name.clone(),
                },
            );

            let outcome = self.converter.convert(file, &output_dir).await;

            if let Some(reason) = outcome.failure_reason() {
                failures.push(ItemFailure {
                    index,
                    name: name.clone(),
                    reason,
                });
            }

            let event = match outcome {
                ItemOutcome::Succeeded => {
                    succeeded += 1;
                    info!(%run_id, "Converted {}", name);
                    RunEvent::ItemSucceeded { run_id, index, name }
                }
                ItemOutcome::Failed { error } => {
                    warn!(%run_id, "Failed to convert {}: {}", name, error);
                    RunEvent::ItemFailed {
                        run_id,
                        index,
                        name,
                        error,
                    }
                }
                ItemOutcome::TimedOut { timeout } => {
                    warn!(%run_id, "Timeout converting {} after {:?}", name, timeout);
                    RunEvent::ItemTimedOut {
                        run_id,
                        index,
                        name,
                        timeout_secs: timeout.as_secs(),
                    }
                }
                ItemOutcome::InvocationError { message } => {
                    warn!(%run_id, "Error converting {}: {}", name, message);
                    RunEvent::ItemError {
                        run_id,
                        index,
                        name,
                        message,
                    }
                }
            };
            post(events, event);
        }

        let summary = RunSummary {
            run_id,
            total,
            succeeded,
            failures,
            output_dir,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            %run_id,
            outcome = ?summary.outcome(),
            "Conversion finished: {}/{} succeeded in {}ms",
            summary.succeeded,
            summary.total,
            summary.elapsed_ms()
        );
        post(
            events,
            RunEvent::Completed {
                summary: summary.clone(),
            },
        );

        summary
    }
}

fn post(events: &mpsc::UnboundedSender<RunEvent>, event: RunEvent) {
    if events.send(event).is_err() {
        debug!("No receiver for run event");
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
