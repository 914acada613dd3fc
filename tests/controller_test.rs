//! Controller and session integration tests against the fake converter.

#![cfg(unix)]

mod common;

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use common::{FakeOffice, FAKE_STDERR};
use officepdf::config::{Config, CreatePolicy};
use officepdf::controller::{AddOutcome, Controller};
use officepdf::prompt::{AssumeNo, AssumeYes};
use officepdf::session::Session;
use officepdf_core::{EntryStatus, Error, FailureReason, RunEvent, RunOutcome};
use officepdf_engine::{ConversionRunner, LibreOfficeConverter};

fn controller_for(fake: &FakeOffice, timeout: Duration) -> Controller {
    let mut config = Config::default();
    config.output.dir = fake.out_dir();
    let converter = LibreOfficeConverter::new(fake.script.clone(), timeout);
    Controller::new(&config, Some(ConversionRunner::new(Arc::new(converter))))
}

#[tokio::test]
async fn partial_run_records_each_failure_kind() {
    let fake = FakeOffice::new();
    let mut controller = controller_for(&fake, Duration::from_secs(1));

    for name in ["one.docx", "bad.docx", "slow.docx"] {
        let path = fake.document(name);
        assert_eq!(controller.add_file(&path, false).unwrap(), AddOutcome::Added);
    }

    let handle = controller.start_run(&AssumeYes).unwrap();
    let mut events = Vec::new();
    let summary = controller
        .drive(handle, |_, event| events.push(event.clone()))
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.outcome(), RunOutcome::Partial);
    assert_eq!(
        summary.failures[0].reason,
        FailureReason::Exit {
            error: format!("{FAKE_STDERR}\n")
        }
    );
    assert_eq!(
        summary.failures[1].reason,
        FailureReason::Timeout { timeout_secs: 1 }
    );

    assert!(events
        .iter()
        .any(|e| matches!(e, RunEvent::ItemTimedOut { name, .. } if name == "slow.docx")));
    assert!(fake.out_dir().join("one.pdf").is_file());
    assert_eq!(controller.queue().count(EntryStatus::Failed), 2);
    assert!(controller.start_enabled());
}

#[tokio::test]
async fn declined_output_dir_leaves_queue_untouched() {
    let fake = FakeOffice::new();
    let mut controller = controller_for(&fake, Duration::from_secs(60));
    controller
        .add_file(&fake.document("one.docx"), false)
        .unwrap();

    let err = controller.start_run(&AssumeNo).unwrap_err();
    assert!(matches!(err, Error::OutputDirDeclined { .. }));
    assert!(!fake.out_dir().exists());
    assert!(!controller.is_running());
    assert_eq!(controller.queue().count(EntryStatus::Pending), 1);
}

#[tokio::test]
async fn always_policy_creates_without_asking() {
    let fake = FakeOffice::new();
    let mut config = Config::default();
    config.output.dir = fake.path().join("a/b/c");
    config.output.create = CreatePolicy::Always;
    let converter = LibreOfficeConverter::new(fake.script.clone(), Duration::from_secs(60));
    let mut controller =
        Controller::new(&config, Some(ConversionRunner::new(Arc::new(converter))));
    controller
        .add_file(&fake.document("one.docx"), false)
        .unwrap();

    let handle = controller.start_run(&AssumeNo).unwrap();
    let summary = controller.drive(handle, |_, _| {}).await.unwrap();

    assert_eq!(summary.outcome(), RunOutcome::AllSucceeded);
    assert!(fake.path().join("a/b/c/one.pdf").is_file());
}

#[test]
fn session_reports_events_and_summary() {
    let fake = FakeOffice::new();
    std::fs::create_dir(fake.out_dir()).unwrap();
    let mut controller = controller_for(&fake, Duration::from_secs(60));
    let rt = tokio::runtime::Runtime::new().unwrap();

    let good = fake.document("good.xlsx");
    let bad = fake.document("bad.pptx");
    let input = format!(
        "add {} {}\nconvert\nremove 1\nlist\nquit\n",
        good.display(),
        bad.display()
    );

    let mut output = Vec::new();
    Session::new(&mut controller, &rt, Cursor::new(input), &mut output)
        .run()
        .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Converting 1/2: good.xlsx"));
    assert!(text.contains("✓ good.xlsx"));
    assert!(text.contains("✗ Failed to convert: bad.pptx"));
    assert!(text.contains("Converted 1 out of 2 files"));
    assert!(text.contains("Removed 1 files"));
    assert!(text.contains("[0] ✓ good.xlsx"));
    assert!(!text.contains("[1]"));
    assert_eq!(controller.queue().len(), 1);
}

#[test]
fn session_rejects_empty_queue_and_unknown_commands() {
    let fake = FakeOffice::new();
    let mut controller = controller_for(&fake, Duration::from_secs(60));
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut output = Vec::new();
    Session::new(
        &mut controller,
        &rt,
        Cursor::new("list\nfrobnicate\nconvert\n"),
        &mut output,
    )
    .run()
    .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Queue is empty"));
    assert!(text.contains("Unknown command: frobnicate"));
    assert!(text.contains("no files queued"));
}

#[test]
fn session_without_converter_shows_guidance() {
    let mut controller = Controller::new(&Config::default(), None);
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut output = Vec::new();
    Session::new(&mut controller, &rt, Cursor::new("quit\n"), &mut output)
        .run()
        .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("sudo apt install libreoffice"));
}

#[test]
fn session_without_converter_does_not_ask_about_output_folder() {
    let fake = FakeOffice::new();
    let doc = fake.document("a.docx");
    let mut config = Config::default();
    config.output.dir = fake.out_dir();
    let mut controller = Controller::new(&config, None);
    let rt = tokio::runtime::Runtime::new().unwrap();

    let input = format!("add {}\nconvert\ny\n", doc.display());
    let mut output = Vec::new();
    Session::new(&mut controller, &rt, Cursor::new(input), &mut output)
        .run()
        .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(!text.contains("[y/N]"));
    assert!(text.contains("conversion is disabled"));
    assert!(!fake.out_dir().exists());
}
