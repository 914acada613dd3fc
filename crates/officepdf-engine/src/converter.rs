//! The converter seam and its LibreOffice implementation.
//!
//! A [`Converter`] turns one input file into a PDF inside an output
//! directory and reports a classified [`ItemOutcome`]. It never returns an
//! error: every way an invocation can go wrong maps to an outcome so the
//! runner can report it and move on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use officepdf_core::config::ConverterConfig;
use officepdf_core::{Error, FailureReason};

use crate::command::{ToolCommand, ToolOutput};

/// Characters of stderr kept when a conversion exits non-zero.
pub const STDERR_EXCERPT_CHARS: usize = 100;

/// Characters of error text kept when the converter cannot be invoked.
pub const INVOCATION_EXCERPT_CHARS: usize = 50;

/// Placeholder used when a failed conversion wrote nothing to stderr.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Classified result of converting a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded,
    /// Non-zero exit; carries the stderr excerpt.
    Failed { error: String },
    /// The converter outlived its time budget and was killed.
    TimedOut { timeout: Duration },
    /// The converter could not be run; carries the error excerpt.
    InvocationError { message: String },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Succeeded)
    }

    /// The failure reason recorded in the run summary, if any.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            ItemOutcome::Succeeded => None,
            ItemOutcome::Failed { error } => Some(FailureReason::Exit {
                error: error.clone(),
            }),
            ItemOutcome::TimedOut { timeout } => Some(FailureReason::Timeout {
                timeout_secs: timeout.as_secs(),
            }),
            ItemOutcome::InvocationError { message } => Some(FailureReason::Invocation {
                message: message.clone(),
            }),
        }
    }
}

/// Something that can convert a document to PDF.
///
/// Implementations must be shareable across tasks; the runner holds them in
/// an `Arc`.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Short identifier used in logs (e.g. `"soffice"`).
    fn name(&self) -> &str;

    /// Convert `input` into `output_dir`. Output naming is up to the
    /// implementation.
    async fn convert(&self, input: &Path, output_dir: &Path) -> ItemOutcome;
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Map a finished process to an outcome.
pub fn classify_output(output: &ToolOutput) -> ItemOutcome {
    if output.success() {
        return ItemOutcome::Succeeded;
    }

    let error = if output.stderr.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        truncate_chars(&output.stderr, STDERR_EXCERPT_CHARS)
    };
    ItemOutcome::Failed { error }
}

/// Map an execution error to an outcome.
///
/// For tool errors the excerpt is cut from the tool's own message, so the
/// OS error is not crowded out by the `Tool error [..]` wrapper.
pub fn classify_error(err: &Error) -> ItemOutcome {
    match err {
        Error::Timeout { timeout, .. } => ItemOutcome::TimedOut { timeout: *timeout },
        Error::Tool { message, .. } => ItemOutcome::InvocationError {
            message: truncate_chars(message, INVOCATION_EXCERPT_CHARS),
        },
        other => ItemOutcome::InvocationError {
            message: truncate_chars(&other.to_string(), INVOCATION_EXCERPT_CHARS),
        },
    }
}

/// Converter backed by a LibreOffice (`soffice`) executable.
#[derive(Debug, Clone)]
pub struct LibreOfficeConverter {
    program: PathBuf,
    timeout: Duration,
}

impl LibreOfficeConverter {
    pub fn new(program: PathBuf, timeout: Duration) -> Self {
        Self { program, timeout }
    }

    /// Build from config using an already-resolved executable path.
    pub fn from_config(program: PathBuf, config: &ConverterConfig) -> Self {
        Self::new(program, config.timeout())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The command that converts `input` into `output_dir`.
    pub fn command(&self, input: &Path, output_dir: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.program.clone());
        cmd.args(["--headless", "--convert-to", "pdf", "--outdir"])
            .arg(output_dir.to_string_lossy())
            .arg(input.to_string_lossy())
            .timeout(self.timeout);
        cmd
    }
}

#[async_trait]
impl Converter for LibreOfficeConverter {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("libreoffice")
    }

    async fn convert(&self, input: &Path, output_dir: &Path) -> ItemOutcome {
        match self.command(input, output_dir).execute().await {
            Ok(output) => {
                if !output.stdout.trim().is_empty() {
                    tracing::debug!(stdout = %output.stdout.trim(), "Converter output");
                }
                classify_output(&output)
            }
            Err(e) => classify_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_layout() {
        let converter =
            LibreOfficeConverter::new(PathBuf::from("libreoffice"), Duration::from_secs(60));
        let cmd = converter.command(Path::new("/docs/a b.docx"), Path::new("/out"));
        assert_eq!(
            cmd.get_args(),
            &["--headless", "--convert-to", "pdf", "--outdir", "/out", "/docs/a b.docx"]
        );
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 10), "ab");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }

    #[test]
    fn spawn_errors_keep_the_os_error_in_fifty_chars() {
        let err = Error::tool("soffice", "failed to spawn: No such file or directory (os error 2)");
        match classify_error(&err) {
            ItemOutcome::InvocationError { message } => {
                assert_eq!(message.chars().count(), INVOCATION_EXCERPT_CHARS);
                assert!(message.contains("No such file"), "excerpt: {message}");
                assert!(!message.contains("Tool error"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn other_errors_use_their_display_text() {
        let err = Error::Validation("converter.timeout_secs must be greater than 0".into());
        match classify_error(&err) {
            ItemOutcome::InvocationError { message } => {
                assert!(message.starts_with("Validation error: converter.timeout_secs"));
                assert_eq!(message.chars().count(), INVOCATION_EXCERPT_CHARS);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn timeout_error_maps_to_timed_out() {
        let err = Error::Timeout {
            tool: "soffice".into(),
            timeout: Duration::from_secs(60),
        };
        assert_eq!(
            classify_error(&err),
            ItemOutcome::TimedOut {
                timeout: Duration::from_secs(60)
            }
        );
    }

    #[test]
    fn failure_reasons() {
        assert!(ItemOutcome::Succeeded.failure_reason().is_none());
        assert_eq!(
            ItemOutcome::TimedOut {
                timeout: Duration::from_secs(5)
            }
            .failure_reason(),
            Some(FailureReason::Timeout { timeout_secs: 5 })
        );
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-soffice");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn zero_exit_succeeds() {
            let dir = tempfile::tempdir().unwrap();
            let converter = LibreOfficeConverter::new(
                script(dir.path(), "echo converted"),
                Duration::from_secs(10),
            );
            let outcome = converter.convert(Path::new("a.docx"), dir.path()).await;
            assert_eq!(outcome, ItemOutcome::Succeeded);
        }

        #[tokio::test]
        async fn non_zero_exit_keeps_first_hundred_stderr_chars() {
            let dir = tempfile::tempdir().unwrap();
            let long = "e".repeat(250);
            let converter = LibreOfficeConverter::new(
                script(dir.path(), &format!("echo {long} >&2; exit 1")),
                Duration::from_secs(10),
            );
            match converter.convert(Path::new("a.docx"), dir.path()).await {
                ItemOutcome::Failed { error } => assert_eq!(error, "e".repeat(100)),
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        #[tokio::test]
        async fn stderr_excerpt_is_taken_verbatim() {
            let dir = tempfile::tempdir().unwrap();
            let converter = LibreOfficeConverter::new(
                script(dir.path(), "printf '  warn: bad input\\n' >&2; exit 1"),
                Duration::from_secs(10),
            );
            assert_eq!(
                converter.convert(Path::new("a.docx"), dir.path()).await,
                ItemOutcome::Failed {
                    error: "  warn: bad input\n".to_string()
                }
            );
        }

        #[tokio::test]
        async fn whitespace_only_stderr_uses_placeholder() {
            let dir = tempfile::tempdir().unwrap();
            let converter = LibreOfficeConverter::new(
                script(dir.path(), "printf '  \\n' >&2; exit 1"),
                Duration::from_secs(10),
            );
            assert_eq!(
                converter.convert(Path::new("a.docx"), dir.path()).await,
                ItemOutcome::Failed {
                    error: UNKNOWN_ERROR.to_string()
                }
            );
        }

        #[tokio::test]
        async fn silent_failure_uses_placeholder() {
            let dir = tempfile::tempdir().unwrap();
            let converter =
                LibreOfficeConverter::new(script(dir.path(), "exit 2"), Duration::from_secs(10));
            assert_eq!(
                converter.convert(Path::new("a.docx"), dir.path()).await,
                ItemOutcome::Failed {
                    error: UNKNOWN_ERROR.to_string()
                }
            );
        }

        #[tokio::test]
        async fn hang_times_out() {
            let dir = tempfile::tempdir().unwrap();
            let converter = LibreOfficeConverter::new(
                script(dir.path(), "sleep 10"),
                Duration::from_millis(200),
            );
            assert_eq!(
                converter.convert(Path::new("a.docx"), dir.path()).await,
                ItemOutcome::TimedOut {
                    timeout: Duration::from_millis(200)
                }
            );
        }

        #[tokio::test]
        async fn missing_program_is_invocation_error() {
            let converter = LibreOfficeConverter::new(
                PathBuf::from("/nonexistent/bin/soffice"),
                Duration::from_secs(1),
            );
            let outcome = converter
                .convert(Path::new("a.docx"), Path::new("/tmp"))
                .await;
            match outcome {
                ItemOutcome::InvocationError { message } => {
                    assert!(message.contains("No such file"), "excerpt: {message}");
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
    }
}
