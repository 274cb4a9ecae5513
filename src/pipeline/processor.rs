//! Downstream processor invocation.
//!
//! The processor is run with four positional arguments (archive type, list
//! name, base directory, staged file path) and inherits stdout and stderr.
//! The adapter waits for it with no timeout.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{PipeError, Result};
use crate::pipeline::types::{DeliveryArgs, ProcessorStatus};

/// The external program that consumes staged messages.
#[derive(Debug, Clone)]
pub struct Processor {
    program: PathBuf,
    /// Arguments placed before the four delivery arguments.
    leading_args: Vec<OsString>,
}

impl Processor {
    /// Processor run directly as `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Run the processor through an interpreter, e.g. `sh -c '<script>' name`.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Path of the processor program.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &DeliveryArgs, staged: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .arg(&args.archive_type)
            .arg(&args.list_name)
            .arg(&args.base_dir)
            .arg(staged)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    /// Run the processor on a staged file and wait for it to terminate.
    pub async fn run(&self, args: &DeliveryArgs, staged: &Path) -> Result<ProcessorStatus> {
        let mut child = self
            .command(args, staged)
            .spawn()
            .map_err(|source| PipeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        debug!(
            program = %self.program.display(),
            pid = ?child.id(),
            "Processor started"
        );

        let status = child.wait().await.map_err(|source| PipeError::Wait {
            program: self.program.clone(),
            source,
        })?;

        Ok(ProcessorStatus::from(status))
    }
}
