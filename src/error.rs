//! Error types for the mail pipe.

use std::io;
use std::path::PathBuf;

/// `EX_USAGE` from sysexits.h.
pub const EXIT_USAGE: u8 = 64;

/// `EX_TEMPFAIL` from sysexits.h. MTAs defer and retry the delivery.
pub const EXIT_TEMPFAIL: u8 = 75;

/// The processor exists but could not be executed (shell convention).
pub const EXIT_NOT_EXECUTABLE: u8 = 126;

/// The processor could not be found (shell convention).
pub const EXIT_NOT_FOUND: u8 = 127;

/// Failures of the adapter itself, as opposed to a non-zero processor exit.
#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    #[error("usage: {program} <archive_type> <list_name> <base_dir>")]
    Usage { program: String },

    #[error("Failed to stage message: {0}")]
    Stage(#[from] StageError),

    #[error("Failed to spawn processor {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for processor {program}: {source}")]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipeError {
    /// Process exit code this failure is reported with.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage { .. } => EXIT_USAGE,
            Self::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => EXIT_NOT_FOUND,
                io::ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
                _ => EXIT_TEMPFAIL,
            },
            Self::Stage(_) | Self::Wait { .. } => EXIT_TEMPFAIL,
        }
    }
}

/// Errors while writing the staged message file.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("cannot create temporary file in {dir}: {source}")]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read message from input: {0}")]
    Read(#[source] io::Error),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for the mail pipe.
pub type Result<T> = std::result::Result<T, PipeError>;
