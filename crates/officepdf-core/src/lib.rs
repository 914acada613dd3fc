//! officepdf-core: shared types, errors, configuration and run events.
//!
//! This crate is the foundational dependency for the other officepdf crates.
//! It owns the [`JobQueue`] the user edits, the typed [`RunId`], the
//! [`RunEvent`] vocabulary the background worker uses to talk to the
//! foreground, and the unified [`Error`] type.

pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod queue;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use events::{FailureReason, ItemFailure, RunEvent, RunOutcome, RunSummary};
pub use ids::RunId;
pub use queue::{display_label, has_extension, EntryStatus, JobQueue, QueueEntry};
