//! End-to-end tests of the `mail-pipe` binary, run the way an MTA would:
//! arguments on the command line, message on stdin.

#![cfg(unix)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::Mutex;

use tempfile::TempDir;

/// Serializes writing stub scripts and spawning the binary, so no child
/// inherits a script that is still open for writing (ETXTBSY).
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn entries(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    paths.sort();
    paths
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("staging")).unwrap();
        Self { dir }
    }

    fn staging(&self) -> PathBuf {
        self.dir.path().join("staging")
    }

    fn record(&self) -> PathBuf {
        self.dir.path().join("record")
    }

    /// Stub processor that records its arguments and the staged content.
    fn processor_script(&self, exit_code: i32) -> String {
        let record = self.record();
        format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$#\" \"$@\" > '{args}'\n\
             cat \"$4\" > '{content}'\n\
             exit {exit_code}\n",
            args = record.with_extension("args").display(),
            content = record.with_extension("content").display(),
        )
    }

    fn recorded_args(&self) -> Vec<String> {
        std::fs::read_to_string(self.record().with_extension("args"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn recorded_content(&self) -> Vec<u8> {
        std::fs::read(self.record().with_extension("content")).unwrap()
    }

    /// Run the binary. `script` of `None` points it at a missing processor.
    fn run(&self, args: &[&str], script: Option<(&str, u32)>, stdin: &[u8]) -> Output {
        let processor = self.dir.path().join("process_mail.sh");

        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((body, mode)) = script {
            std::fs::write(&processor, body).unwrap();
            std::fs::set_permissions(&processor, std::fs::Permissions::from_mode(mode)).unwrap();
        }

        let mut child = Command::new(env!("CARGO_BIN_EXE_mail-pipe"))
            .args(args)
            .env("MAIL_PIPE_PROCESSOR", &processor)
            .env("MAIL_PIPE_TMPDIR", self.staging())
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        drop(_guard);

        // The binary may exit before reading stdin (usage errors).
        let mut pipe = child.stdin.take().unwrap();
        let _ = pipe.write_all(stdin);
        drop(pipe);
        child.wait_with_output().unwrap()
    }
}

#[test]
fn binary_success_removes_staged_file() {
    let fx = Fixture::new();
    let script = fx.processor_script(0);

    let output = fx.run(
        &["mbox", "dev", "/var/lists"],
        Some((&script, 0o755)),
        b"Subject: hi\n",
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fx.recorded_content(), b"Subject: hi");

    let args = fx.recorded_args();
    assert_eq!(&args[..4], ["4", "mbox", "dev", "/var/lists"]);
    let staged = Path::new(&args[4]);
    assert!(staged.starts_with(fx.staging()));
    assert!(!staged.exists());
    assert!(entries(&fx.staging()).is_empty());
}

#[test]
fn binary_failure_propagates_code_and_keeps_file() {
    let fx = Fixture::new();
    let script = fx.processor_script(5);

    let output = fx.run(
        &["mbox", "dev", "/var/lists"],
        Some((&script, 0o755)),
        b"From: a@example.org\nSubject: broken\n\nbody\n",
    );

    assert_eq!(output.status.code(), Some(5));
    let kept = entries(&fx.staging());
    assert_eq!(kept.len(), 1);
    assert_eq!(
        std::fs::read(&kept[0]).unwrap(),
        b"From: a@example.org\nSubject: broken\n\nbody"
    );
    assert_eq!(fx.recorded_args()[4], kept[0].display().to_string());
}

#[test]
fn binary_empty_input_is_staged_empty() {
    let fx = Fixture::new();
    let script = fx.processor_script(1);

    let output = fx.run(&["mbox", "dev", "/var/lists"], Some((&script, 0o755)), b"");

    assert_eq!(output.status.code(), Some(1));
    assert!(fx.recorded_content().is_empty());
    let kept = entries(&fx.staging());
    assert_eq!(kept.len(), 1);
    assert!(std::fs::read(&kept[0]).unwrap().is_empty());
}

#[test]
fn binary_missing_processor_exits_127() {
    let fx = Fixture::new();

    let output = fx.run(&["mbox", "dev", "/var/lists"], None, b"Subject: hi\n");

    assert_eq!(output.status.code(), Some(127));
    let kept = entries(&fx.staging());
    assert_eq!(kept.len(), 1);
    assert_eq!(std::fs::read(&kept[0]).unwrap(), b"Subject: hi");
}

#[test]
fn binary_non_executable_processor_exits_126() {
    let fx = Fixture::new();
    let script = fx.processor_script(0);

    let output = fx.run(
        &["mbox", "dev", "/var/lists"],
        Some((&script, 0o644)),
        b"Subject: hi\n",
    );

    assert_eq!(output.status.code(), Some(126));
    assert_eq!(entries(&fx.staging()).len(), 1);
}

#[test]
fn binary_wrong_argument_count_is_usage_error() {
    let fx = Fixture::new();
    let script = fx.processor_script(0);

    let output = fx.run(&["mbox", "dev"], Some((&script, 0o755)), b"Subject: hi\n");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage:"));
    assert!(entries(&fx.staging()).is_empty());
    assert!(!fx.record().with_extension("args").exists());
}
