//! # officepdf-engine
//!
//! External tool plumbing for officepdf.
//!
//! - **Discovery** ([`locate_converter`], [`check_converter`]) -- find the
//!   converter on `PATH` or at a configured location.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Conversion** ([`Converter`], [`LibreOfficeConverter`]) -- one file in,
//!   one classified [`ItemOutcome`] out.
//! - **Runner** ([`ConversionRunner`]) -- the sequential loop that drives a
//!   converter over a queue snapshot on a background task.

pub mod command;
pub mod converter;
pub mod runner;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use converter::{Converter, ItemOutcome, LibreOfficeConverter};
pub use runner::{ConversionRunner, RunHandle, RunJob};
pub use tools::{check_converter, locate_converter, ToolInfo};
