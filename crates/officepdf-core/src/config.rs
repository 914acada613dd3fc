//! Application configuration types.
//!
//! The top-level [`Config`] is deserialized from TOML by the application
//! crate. Every section defaults sensibly so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::queue::DEFAULT_LABEL_MAX_LEN;
use crate::Error;

/// Default per-file converter timeout: 60 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub converter: ConverterConfig,
    pub output: OutputConfig,
    pub queue: QueueConfig,
}

impl Config {
    /// Check hard constraints. Returns an error for values that would make a
    /// run impossible.
    pub fn check(&self) -> Result<()> {
        if self.converter.timeout_secs == 0 {
            return Err(Error::Validation(
                "converter.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.converter.binary.trim().is_empty() && self.converter.path.is_none() {
            return Err(Error::Validation(
                "converter.binary is empty and no converter.path is set".into(),
            ));
        }

        if self.queue.label_max_len < 4 {
            return Err(Error::Validation(format!(
                "queue.label_max_len must be at least 4 (got {})",
                self.queue.label_max_len
            )));
        }

        Ok(())
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.queue.extensions.is_empty() {
            warnings.push("queue.extensions is empty; every file will be rejected unless --all-files is used".into());
        }

        if let Some(ref path) = self.converter.path {
            if !path.exists() {
                warnings.push(format!(
                    "converter.path {} does not exist; falling back to PATH lookup of '{}'",
                    path.display(),
                    self.converter.binary
                ));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// How to reach the converter engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Name looked up on `PATH`.
    pub binary: String,
    /// Explicit executable path; wins over `binary` when it exists.
    pub path: Option<PathBuf>,
    /// Per-file time budget in seconds.
    pub timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            binary: "libreoffice".into(),
            path: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConverterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// What to do when the output directory is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatePolicy {
    /// Ask the user.
    #[default]
    Ask,
    /// Create without asking.
    Always,
    /// Never create; abort the run.
    Never,
}

/// Output directory settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output directory; `~` is expanded by the loader.
    pub dir: PathBuf,
    pub create: CreatePolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("~/Desktop"),
            create: CreatePolicy::Ask,
        }
    }
}

/// Queue admission and presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Accepted file extensions, without the dot.
    pub extensions: Vec<String>,
    /// Display labels longer than this are truncated.
    pub label_max_len: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            extensions: ["docx", "doc", "xlsx", "xls", "odt", "ods", "ppt", "pptx"]
                .into_iter()
                .map(String::from)
                .collect(),
            label_max_len: DEFAULT_LABEL_MAX_LEN,
        }
    }
}
