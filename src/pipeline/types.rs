//! Types that flow through a single pipe delivery.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Positional arguments the MTA hands to the adapter.
///
/// All three are opaque and forwarded to the processor unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryArgs {
    pub archive_type: OsString,
    pub list_name: OsString,
    pub base_dir: OsString,
}

impl DeliveryArgs {
    /// Build from anything convertible to `OsString`.
    pub fn new(
        archive_type: impl Into<OsString>,
        list_name: impl Into<OsString>,
        base_dir: impl Into<OsString>,
    ) -> Self {
        Self {
            archive_type: archive_type.into(),
            list_name: list_name.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Take exactly three positional arguments, or `None` for any other count.
    pub fn from_args<I>(args: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let parsed = Self {
            archive_type: args.next()?,
            list_name: args.next()?,
            base_dir: args.next()?,
        };
        match args.next() {
            Some(_) => None,
            None => Some(parsed),
        }
    }
}

/// How the processor terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorStatus {
    /// Normal exit with the given code.
    Exited(i32),
    /// Killed by the given signal (Unix only).
    Signaled(i32),
}

impl ProcessorStatus {
    /// Only a normal exit with code zero is success.
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    /// Exit code to report for this status; signals map to `128 + signal`.
    pub fn code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            Self::Signaled(signal) => 128 + signal,
        }
    }

    /// Exit code truncated to what a process can return.
    pub fn exit_code(&self) -> u8 {
        (self.code() & 0xff) as u8
    }
}

impl From<std::process::ExitStatus> for ProcessorStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }
        Self::Exited(1)
    }
}

impl fmt::Display for ProcessorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exit code {code}"),
            Self::Signaled(signal) => write!(f, "signal {signal}"),
        }
    }
}

/// Result of one delivery once the processor has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Processor succeeded and the staged file was discarded.
    Processed,
    /// Processor failed; the staged file is left at `kept` for inspection.
    Failed {
        status: ProcessorStatus,
        kept: PathBuf,
    },
}

impl DeliveryOutcome {
    /// Exit code the adapter terminates with.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Processed => 0,
            Self::Failed { status, .. } => status.exit_code(),
        }
    }
}
