//! Converter discovery.
//!
//! The converter is found the same way a shell would find it: an explicit
//! configured path wins when it exists, otherwise the binary name is looked
//! up on `PATH` with [`which::which`].

use std::path::{Path, PathBuf};

use officepdf_core::config::ConverterConfig;
use officepdf_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Availability information for the converter, as shown by `check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `--version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Resolve the converter executable.
///
/// # Errors
///
/// Returns [`Error::ConverterNotFound`] (which carries installation
/// guidance) if neither the configured path nor a `PATH` lookup succeeds.
pub fn locate_converter(config: &ConverterConfig) -> Result<PathBuf> {
    if let Some(ref path) = config.path {
        if path.exists() {
            return Ok(path.clone());
        }
        tracing::warn!(
            "Configured converter path {} does not exist; trying PATH",
            path.display()
        );
    }

    which::which(&config.binary).map_err(|_| {
        let wanted = match config.path {
            Some(ref p) if config.binary.is_empty() => p.display().to_string(),
            _ => config.binary.clone(),
        };
        Error::converter_not_found(wanted)
    })
}

/// Report whether the converter is available, with its version.
pub fn check_converter(config: &ConverterConfig) -> ToolInfo {
    match locate_converter(config) {
        Ok(path) => ToolInfo {
            name: config.binary.clone(),
            available: true,
            version: detect_version(&path),
            path: Some(path),
        },
        Err(_) => ToolInfo {
            name: config.binary.clone(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Run `<tool> --version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("--version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
