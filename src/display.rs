//! Terminal wording for queue entries, run events and summaries.

use officepdf_core::{EntryStatus, QueueEntry, RunEvent, RunOutcome, RunSummary};

pub const READY: &str = "Ready to convert files";

pub fn starting(total: usize) -> String {
    format!("Starting conversion of {total} files...")
}

/// Progress line for the item at zero-based `index`.
pub fn converting(index: usize, total: usize, name: &str) -> String {
    format!("Converting {}/{}: {}", index + 1, total, name)
}

fn marker(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Pending => "·",
        EntryStatus::Converting => "…",
        EntryStatus::Succeeded => "✓",
        EntryStatus::Failed => "✗",
    }
}

/// One row of the queue listing.
pub fn entry_line(index: usize, entry: &QueueEntry) -> String {
    format!("[{index}] {} {}", marker(entry.status), entry.label)
}

/// Human-readable line(s) for an event. `Completed` is rendered through
/// [`headline`] and [`details`] instead.
pub fn event_line(event: &RunEvent) -> Option<String> {
    match event {
        RunEvent::RunStarted { total, .. } => Some(starting(*total)),
        RunEvent::ItemStarted {
            index, total, name, ..
        } => Some(converting(*index, *total, name)),
        RunEvent::ItemSucceeded { name, .. } => Some(format!("✓ {name}")),
        RunEvent::ItemFailed { name, error, .. } => {
            Some(format!("✗ Failed to convert: {name}\n  Error: {}", error.trim_end()))
        }
        RunEvent::ItemTimedOut { name, .. } => Some(format!("✗ Timeout: {name} took too long")),
        RunEvent::ItemError { name, message, .. } => {
            Some(format!("✗ Error converting {name}: {message}"))
        }
        RunEvent::Completed { .. } => None,
    }
}

/// Short status-line summary of a finished run.
pub fn headline(summary: &RunSummary) -> String {
    match summary.outcome() {
        RunOutcome::AllSucceeded => format!("Successfully converted {} files!", summary.succeeded),
        RunOutcome::Partial => format!(
            "Converted {} out of {} files",
            summary.succeeded, summary.total
        ),
        RunOutcome::Failed => "Conversion failed!".to_string(),
    }
}

/// Longer completion message.
pub fn details(summary: &RunSummary) -> String {
    let dir = summary.output_dir.display();
    match summary.outcome() {
        RunOutcome::AllSucceeded => format!(
            "All {} files converted successfully!\n\nSaved to:\n{}",
            summary.succeeded, dir
        ),
        RunOutcome::Partial => format!(
            "Converted {}/{} files\n\nSaved to:\n{}\n\nCheck error messages for failed files.",
            summary.succeeded, summary.total, dir
        ),
        RunOutcome::Failed => format!(
            "Failed to convert all {} files.\n\nCheck error messages above.",
            summary.total
        ),
    }
}

/// One JSON object per line, for `--json`.
pub fn json_line(event: &RunEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize event: {}", e);
        String::from("{}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use officepdf_core::RunId;
    use std::path::PathBuf;

    fn summary(total: usize, succeeded: usize) -> RunSummary {
        let now = Utc::now();
        RunSummary {
            run_id: RunId::new(),
            total,
            succeeded,
            failures: Vec::new(),
            output_dir: PathBuf::from("/home/me/Desktop"),
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn progress_is_one_based() {
        assert_eq!(converting(0, 3, "a.docx"), "Converting 1/3: a.docx");
    }

    #[test]
    fn headlines() {
        assert_eq!(headline(&summary(4, 4)), "Successfully converted 4 files!");
        assert_eq!(headline(&summary(4, 1)), "Converted 1 out of 4 files");
        assert_eq!(headline(&summary(4, 0)), "Conversion failed!");
    }

    #[test]
    fn partial_details_point_at_errors() {
        let text = details(&summary(3, 2));
        assert!(text.contains("Converted 2/3 files"));
        assert!(text.contains("/home/me/Desktop"));
        assert!(text.contains("Check error messages for failed files."));
    }

    #[test]
    fn failure_details_omit_output_dir() {
        let text = details(&summary(2, 0));
        assert!(text.starts_with("Failed to convert all 2 files."));
        assert!(!text.contains("Saved to"));
    }

    #[test]
    fn failure_event_lines() {
        let run_id = RunId::new();
        let line = event_line(&RunEvent::ItemTimedOut {
            run_id,
            index: 0,
            name: "deck.pptx".into(),
            timeout_secs: 60,
        })
        .unwrap();
        assert_eq!(line, "✗ Timeout: deck.pptx took too long");

        let line = event_line(&RunEvent::ItemFailed {
            run_id,
            index: 1,
            name: "sheet.xlsx".into(),
            error: "Unknown error".into(),
        })
        .unwrap();
        assert!(line.contains("Failed to convert: sheet.xlsx"));
        assert!(line.contains("Error: Unknown error"));

        let line = event_line(&RunEvent::ItemFailed {
            run_id,
            index: 2,
            name: "memo.doc".into(),
            error: "source file could not be loaded\n".into(),
        })
        .unwrap();
        assert!(line.ends_with("Error: source file could not be loaded"));
    }

    #[test]
    fn completed_has_no_event_line() {
        assert!(event_line(&RunEvent::Completed {
            summary: summary(1, 1)
        })
        .is_none());
    }

    #[test]
    fn json_lines_are_tagged() {
        let line = json_line(&RunEvent::RunStarted {
            run_id: RunId::new(),
            total: 2,
            output_dir: PathBuf::from("/out"),
        });
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "run_started");
        assert_eq!(value["total"], 2);
    }
}
