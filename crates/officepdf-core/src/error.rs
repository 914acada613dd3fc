//! Unified error type for officepdf.
//!
//! Per-item conversion failures are *not* errors: they are classified
//! outcomes reported through [`crate::RunEvent`]s. [`Error`] covers setup
//! failures that stop a run before it starts, and plumbing failures inside
//! the tool layer.

use std::path::PathBuf;
use std::time::Duration;

/// Installation guidance shown when the converter binary cannot be found.
pub const INSTALL_GUIDANCE: &str = "LibreOffice is required for PDF conversions.\n\n\
Install it with:\n\n\
Ubuntu/Debian: sudo apt install libreoffice\n\
Fedora: sudo dnf install libreoffice\n\
Arch: sudo pacman -S libreoffice-fresh\n\n\
Or download from: https://libreoffice.org";

/// Unified error type covering all failure modes in officepdf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The converter binary is not installed or not on PATH.
    #[error("converter not found: {binary}\n\n{INSTALL_GUIDANCE}")]
    ConverterNotFound {
        /// Binary name or configured path that was looked up.
        binary: String,
    },

    /// The start control is disabled because no converter is available.
    #[error("conversion is disabled: the converter was not found at startup")]
    ConverterUnavailable,

    /// The output directory is missing and the user declined to create it.
    #[error("output folder does not exist: {}", path.display())]
    OutputDirDeclined {
        /// The missing directory.
        path: PathBuf,
    },

    /// Creating the output directory failed.
    #[error("cannot create folder {}: {source}", path.display())]
    OutputDirCreate {
        /// The directory we tried to create.
        path: PathBuf,
        /// The underlying I/O error (permission denied, etc.).
        source: std::io::Error,
    },

    /// A run was requested with nothing queued.
    #[error("no files queued: please add files first")]
    EmptyQueue,

    /// The request conflicts with a run that is still in progress.
    #[error("a conversion run is already in progress")]
    RunInProgress,

    /// An external tool could not be executed.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An external tool did not finish within its time budget.
    #[error("Tool error [{tool}]: timed out after {}s", timeout.as_secs())]
    Timeout {
        /// Name of the tool that was killed.
        tool: String,
        /// The budget that elapsed.
        timeout: Duration,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Configuration data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::ConverterNotFound`].
    pub fn converter_not_found(binary: impl Into<String>) -> Self {
        Error::ConverterNotFound {
            binary: binary.into(),
        }
    }

    /// Whether this error aborts a run before any conversion is attempted.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Error::ConverterNotFound { .. }
                | Error::ConverterUnavailable
                | Error::OutputDirDeclined { .. }
                | Error::OutputDirCreate { .. }
                | Error::EmptyQueue
        )
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
