//! The Job Queue: an ordered, de-duplicated list of files to convert.
//!
//! The queue is a plain owned value. The foreground holds it for the process
//! lifetime; a run only ever sees a [`JobQueue::snapshot`] taken at start.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Default maximum length of a display label, in characters.
pub const DEFAULT_LABEL_MAX_LEN: usize = 50;

/// Conversion status of a single queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Converting,
    Succeeded,
    Failed,
}

impl EntryStatus {
    /// Whether `self -> next` is a legal transition within a run.
    pub fn can_transition_to(self, next: EntryStatus) -> bool {
        matches!(
            (self, next),
            (EntryStatus::Pending, EntryStatus::Converting)
                | (EntryStatus::Converting, EntryStatus::Succeeded)
                | (EntryStatus::Converting, EntryStatus::Failed)
        )
    }

    /// Whether this status ends the entry's part in a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, EntryStatus::Succeeded | EntryStatus::Failed)
    }
}

/// One file tracked for conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Path as supplied by the user.
    pub path: PathBuf,
    /// Truncated file name for presentation.
    pub label: String,
    /// Current conversion status.
    pub status: EntryStatus,
}

/// Build the display label for `path`: its file name, cut to `max_len`
/// characters with a trailing `...` when longer.
pub fn display_label(path: &Path, max_len: usize) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    if name.chars().count() <= max_len {
        return name;
    }

    let keep = max_len.saturating_sub(3);
    let mut label: String = name.chars().take(keep).collect();
    label.push_str("...");
    label
}

/// Whether `path` has one of `extensions` (case-insensitive, without dot).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Ordered, duplicate-free list of files plus their conversion status.
#[derive(Debug, Clone)]
pub struct JobQueue {
    entries: Vec<QueueEntry>,
    label_max_len: usize,
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueue {
    /// Create an empty queue with the default label length.
    pub fn new() -> Self {
        Self::with_label_len(DEFAULT_LABEL_MAX_LEN)
    }

    /// Create an empty queue whose labels are cut at `label_max_len`.
    pub fn with_label_len(label_max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            label_max_len,
        }
    }

    /// Append `path` as a Pending entry.
    ///
    /// Returns `false` and leaves the queue untouched if the path is already
    /// queued.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }

        let label = display_label(&path, self.label_max_len);
        self.entries.push(QueueEntry {
            path,
            label,
            status: EntryStatus::Pending,
        });
        true
    }

    /// Remove the entries at `indices`.
    ///
    /// Indices are applied highest first so earlier removals never shift
    /// later ones. Duplicates and out-of-range indices are ignored. Returns
    /// how many entries were removed.
    pub fn remove(&mut self, indices: &[usize]) -> usize {
        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        let mut removed = 0;

        for index in unique.into_iter().rev() {
            if index < self.entries.len() {
                self.entries.remove(index);
                removed += 1;
            }
        }

        removed
    }

    /// Empty the queue.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// The queued paths, in order, as handed to a run.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    /// Put every entry back to Pending ahead of a new run.
    pub fn reset_statuses(&mut self) {
        for entry in &mut self.entries {
            entry.status = EntryStatus::Pending;
        }
    }

    /// Move the entry at `index` to `status`.
    ///
    /// Returns `false` (and changes nothing) if the index is out of range or
    /// the transition is not allowed by the entry state machine.
    pub fn set_status(&mut self, index: usize, status: EntryStatus) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };

        if !entry.status.can_transition_to(status) {
            tracing::debug!(
                index,
                from = ?entry.status,
                to = ?status,
                "Rejected queue entry transition"
            );
            return false;
        }

        entry.status = status;
        true
    }

    /// Number of entries currently in `status`.
    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}
