//! Foreground controller.
//!
//! Owns everything the user sees: the [`JobQueue`], the output directory,
//! the start control and the status line. It is the only writer of that
//! state. Background workers talk to it exclusively through [`RunEvent`]s
//! handed to [`Controller::apply`].

use std::path::{Path, PathBuf};

use officepdf_core::config::{Config, CreatePolicy};
use officepdf_core::{has_extension, EntryStatus, Error, JobQueue, Result, RunEvent, RunId, RunSummary};
use officepdf_engine::{ConversionRunner, RunHandle, RunJob};
use tracing::{debug, error, info};

use crate::display;
use crate::prompt::Confirm;

/// Result of offering a file to the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Already queued; nothing changed.
    Duplicate,
    /// Extension not in the accepted list.
    Unsupported,
    /// No such file.
    Missing,
}

pub struct Controller {
    queue: JobQueue,
    output_dir: PathBuf,
    create_policy: CreatePolicy,
    extensions: Vec<String>,
    /// `None` when the converter was not found at startup.
    runner: Option<ConversionRunner>,
    start_enabled: bool,
    active_run: Option<RunId>,
    status: String,
    last_summary: Option<RunSummary>,
}

impl Controller {
    pub fn new(config: &Config, runner: Option<ConversionRunner>) -> Self {
        let start_enabled = runner.is_some();
        Self {
            queue: JobQueue::with_label_len(config.queue.label_max_len),
            output_dir: config.output.dir.clone(),
            create_policy: config.output.create,
            extensions: config.queue.extensions.clone(),
            runner,
            start_enabled,
            active_run: None,
            status: display::READY.to_string(),
            last_summary: None,
        }
    }

    // -- Accessors -----------------------------------------------------------

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether the "start conversion" control is enabled.
    pub fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    pub fn converter_available(&self) -> bool {
        self.runner.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.active_run.is_some()
    }

    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    // -- Queue editing -------------------------------------------------------

    fn ensure_idle(&self) -> Result<()> {
        if self.is_running() {
            return Err(Error::RunInProgress);
        }
        Ok(())
    }

    /// Offer `path` to the queue. With `all_files` the extension filter is
    /// skipped.
    pub fn add_file(&mut self, path: &Path, all_files: bool) -> Result<AddOutcome> {
        self.ensure_idle()?;

        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if !path.is_file() {
            return Ok(AddOutcome::Missing);
        }

        if !all_files && !has_extension(&path, &self.extensions) {
            return Ok(AddOutcome::Unsupported);
        }

        if self.queue.add(path) {
            Ok(AddOutcome::Added)
        } else {
            Ok(AddOutcome::Duplicate)
        }
    }

    pub fn remove(&mut self, indices: &[usize]) -> Result<usize> {
        self.ensure_idle()?;
        Ok(self.queue.remove(indices))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.queue.clear();
        Ok(())
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.ensure_idle()?;
        self.output_dir = dir;
        Ok(())
    }

    // -- Runs ----------------------------------------------------------------

    /// Whether starting now would require consent to create the output dir.
    pub fn needs_confirmation(&self) -> bool {
        !self.output_dir.exists() && self.create_policy == CreatePolicy::Ask
    }

    /// Make sure the output directory exists, creating it if allowed.
    fn prepare_output_dir(&self, confirm: &dyn Confirm) -> Result<()> {
        let dir = &self.output_dir;

        if dir.is_dir() {
            return Ok(());
        }

        if dir.exists() {
            return Err(Error::OutputDirCreate {
                path: dir.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                ),
            });
        }

        let create = match self.create_policy {
            CreatePolicy::Always => true,
            CreatePolicy::Never => false,
            CreatePolicy::Ask => confirm.confirm(&format!(
                "Output folder doesn't exist:\n{}\n\nCreate it?",
                dir.display()
            )),
        };

        if !create {
            info!("Output folder creation declined: {}", dir.display());
            return Err(Error::OutputDirDeclined { path: dir.clone() });
        }

        std::fs::create_dir_all(dir).map_err(|source| Error::OutputDirCreate {
            path: dir.clone(),
            source,
        })?;
        info!("Created output folder {}", dir.display());
        Ok(())
    }

    /// The checks `start_run` makes before touching the output folder, in
    /// order: active run, converter presence, empty queue.
    pub fn can_start(&self) -> Result<()> {
        if self.is_running() {
            return Err(Error::RunInProgress);
        }
        if self.runner.is_none() {
            return Err(Error::ConverterUnavailable);
        }
        if !self.start_enabled {
            return Err(Error::RunInProgress);
        }
        if self.queue.is_empty() {
            return Err(Error::EmptyQueue);
        }
        Ok(())
    }

    /// Start a run over the current queue on a background worker.
    ///
    /// Setup checks happen here, on the foreground, before any worker
    /// exists: a rejected start never produces an event. Must be called
    /// with a tokio runtime entered.
    pub fn start_run(&mut self, confirm: &dyn Confirm) -> Result<RunHandle> {
        self.can_start()?;
        let Some(runner) = self.runner.clone() else {
            return Err(Error::ConverterUnavailable);
        };

        self.prepare_output_dir(confirm)?;

        self.queue.reset_statuses();
        let job = RunJob::new(self.queue.snapshot(), self.output_dir.clone());

        self.start_enabled = false;
        self.active_run = Some(job.run_id);
        self.status = display::starting(job.files.len());

        info!(run_id = %job.run_id, "Run started with {} files", job.files.len());
        Ok(runner.spawn(job))
    }

    /// Apply one event from the worker. Returns `false` if the event was
    /// ignored because it belongs to another run.
    pub fn apply(&mut self, event: &RunEvent) -> bool {
        if self.active_run != Some(event.run_id()) {
            debug!(run_id = %event.run_id(), "Ignoring event from inactive run");
            return false;
        }

        match event {
            RunEvent::RunStarted { total, .. } => {
                self.status = display::starting(*total);
            }
            RunEvent::ItemStarted {
                index, total, name, ..
            } => {
                self.queue.set_status(*index, EntryStatus::Converting);
                self.status = display::converting(*index, *total, name);
            }
            RunEvent::ItemSucceeded { index, .. } => {
                self.queue.set_status(*index, EntryStatus::Succeeded);
            }
            RunEvent::ItemFailed { index, .. }
            | RunEvent::ItemTimedOut { index, .. }
            | RunEvent::ItemError { index, .. } => {
                self.queue.set_status(*index, EntryStatus::Failed);
            }
            RunEvent::Completed { summary } => {
                self.status = display::headline(summary);
                self.last_summary = Some(summary.clone());
                self.finish_run();
            }
        }

        true
    }

    fn finish_run(&mut self) {
        self.active_run = None;
        // Re-enabling the start control is always the last step of a run.
        self.start_enabled = self.runner.is_some();
    }

    /// Drain `handle` until the run completes, applying each event and then
    /// passing it to `on_event` for rendering.
    ///
    /// Returns the run summary, or `None` if the worker died before
    /// completing. The start control is re-enabled either way.
    pub async fn drive<F>(&mut self, handle: RunHandle, mut on_event: F) -> Option<RunSummary>
    where
        F: FnMut(&Controller, &RunEvent),
    {
        let RunHandle {
            run_id,
            mut events,
            worker,
        } = handle;

        while let Some(event) = events.recv().await {
            if self.apply(&event) {
                on_event(self, &event);
            }
            if matches!(event, RunEvent::Completed { .. }) && event.run_id() == run_id {
                break;
            }
        }

        match worker.await {
            Ok(summary) => {
                if self.active_run == Some(run_id) {
                    // Channel closed without a completion event.
                    self.status = display::headline(&summary);
                    self.last_summary = Some(summary.clone());
                    self.finish_run();
                }
                Some(summary)
            }
            Err(e) => {
                error!(%run_id, "Conversion worker failed: {}", e);
                if self.active_run == Some(run_id) {
                    self.status = format!("Conversion aborted: {e}");
                    self.finish_run();
                }
                None
            }
        }
    }
}
