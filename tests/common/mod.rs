//! Shared test harness for integration tests.
//!
//! Provides [`FakeOffice`], a temporary directory holding a shell script that
//! answers the converter command line the way LibreOffice does. Files whose
//! name contains `bad` fail with a message on stderr, files containing `slow`
//! sleep before converting, everything else produces `<stem>.pdf`.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const FAKE_VERSION: &str = "LibreOffice 7.6.4.1 (test double)";
pub const FAKE_STDERR: &str = "Error: source file could not be loaded";

const SCRIPT: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "LibreOffice 7.6.4.1 (test double)"
    exit 0
fi
outdir=""
input=""
while [ $# -gt 0 ]; do
    case "$1" in
        --outdir) outdir="$2"; shift 2 ;;
        --convert-to) shift 2 ;;
        --headless) shift ;;
        *) input="$1"; shift ;;
    esac
done
name=$(basename "$input")
case "$name" in
    *bad*) echo "Error: source file could not be loaded" >&2; exit 1 ;;
    *slow*) sleep 5 ;;
esac
: > "$outdir/${name%.*}.pdf"
"#;

/// A scratch workspace with a fake converter, input documents and a config
/// file pointing at the fake.
pub struct FakeOffice {
    pub dir: TempDir,
    pub script: PathBuf,
}

impl FakeOffice {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let script = dir.path().join("fake-soffice");
        fs::write(&script, SCRIPT).expect("failed to write fake converter");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("failed to mark fake converter executable");
        Self { dir, script }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create an input document named `name` and return its path.
    pub fn document(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, b"office document").expect("failed to write document");
        path
    }

    /// Output directory inside the workspace (not created).
    pub fn out_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Write a config file using the fake converter and return its path.
    pub fn config(&self, timeout_secs: u64) -> PathBuf {
        let path = self.path().join("officepdf.toml");
        fs::write(
            &path,
            format!(
                "[converter]\nbinary = \"fake-soffice\"\npath = \"{}\"\ntimeout_secs = {}\n\n[output]\ndir = \"{}\"\n",
                self.script.display(),
                timeout_secs,
                self.out_dir().display()
            ),
        )
        .expect("failed to write config");
        path
    }
}
