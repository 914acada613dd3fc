//! Status events flowing from the background worker to the foreground.
//!
//! The worker never touches presentation state. It posts [`RunEvent`]s over
//! a channel and the foreground applies them one at a time. Every run emits
//! zero or more item events followed by exactly one [`RunEvent::Completed`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ids::RunId;

// ---------------------------------------------------------------------------
// RunEvent
// ---------------------------------------------------------------------------

/// What happened during a run. Indices are zero-based queue positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    // -- Run lifecycle -------------------------------------------------------
    RunStarted {
        run_id: RunId,
        total: usize,
        output_dir: PathBuf,
    },
    Completed {
        summary: RunSummary,
    },

    // -- Item lifecycle ------------------------------------------------------
    ItemStarted {
        run_id: RunId,
        index: usize,
        total: usize,
        name: String,
    },
    ItemSucceeded {
        run_id: RunId,
        index: usize,
        name: String,
    },
    /// The converter exited with a non-zero status.
    ItemFailed {
        run_id: RunId,
        index: usize,
        name: String,
        error: String,
    },
    /// The converter did not finish within the timeout and was killed.
    ItemTimedOut {
        run_id: RunId,
        index: usize,
        name: String,
        timeout_secs: u64,
    },
    /// The converter could not be invoked at all.
    ItemError {
        run_id: RunId,
        index: usize,
        name: String,
        message: String,
    },
}

impl RunEvent {
    /// The run this event belongs to.
    pub fn run_id(&self) -> RunId {
        match self {
            RunEvent::RunStarted { run_id, .. }
            | RunEvent::ItemStarted { run_id, .. }
            | RunEvent::ItemSucceeded { run_id, .. }
            | RunEvent::ItemFailed { run_id, .. }
            | RunEvent::ItemTimedOut { run_id, .. }
            | RunEvent::ItemError { run_id, .. } => *run_id,
            RunEvent::Completed { summary } => summary.run_id,
        }
    }

    /// Queue index for item events, `None` for run lifecycle events.
    pub fn index(&self) -> Option<usize> {
        match self {
            RunEvent::ItemStarted { index, .. }
            | RunEvent::ItemSucceeded { index, .. }
            | RunEvent::ItemFailed { index, .. }
            | RunEvent::ItemTimedOut { index, .. }
            | RunEvent::ItemError { index, .. } => Some(*index),
            RunEvent::RunStarted { .. } | RunEvent::Completed { .. } => None,
        }
    }

    /// Whether this is one of the three per-item failure events.
    pub fn is_item_failure(&self) -> bool {
        matches!(
            self,
            RunEvent::ItemFailed { .. } | RunEvent::ItemTimedOut { .. } | RunEvent::ItemError { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

/// Why a single item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Non-zero exit; `error` is the stderr excerpt.
    Exit { error: String },
    /// Timed out after `timeout_secs`.
    Timeout { timeout_secs: u64 },
    /// Spawn or wait failure; `message` is the error excerpt.
    Invocation { message: String },
}

/// One failed item, as recorded in the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub index: usize,
    pub name: String,
    pub reason: FailureReason,
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Overall classification of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    AllSucceeded,
    Partial,
    Failed,
}

/// Aggregate result of one run, reported once by [`RunEvent::Completed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.succeeded == self.total {
            RunOutcome::AllSucceeded
        } else if self.succeeded > 0 {
            RunOutcome::Partial
        } else {
            RunOutcome::Failed
        }
    }

    /// Wall-clock duration of the run in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
