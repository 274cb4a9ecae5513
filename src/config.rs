//! Configuration types.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of the processor looked up next to the running executable.
pub const DEFAULT_PROCESSOR: &str = "process_mail.sh";

/// Pipe adapter configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct PipeConfig {
    /// Downstream program that consumes the staged message.
    pub processor: PathBuf,
    /// Directory to stage messages in (`None` uses the platform temp dir).
    pub staging_dir: Option<PathBuf>,
}

impl PipeConfig {
    /// Build config from environment variables.
    ///
    /// `MAIL_PIPE_PROCESSOR` overrides the processor path and
    /// `MAIL_PIPE_TMPDIR` the staging directory. Empty values count as unset.
    pub fn from_env() -> Self {
        let processor = non_empty_var("MAIL_PIPE_PROCESSOR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let exe = std::env::current_exe().ok();
                default_processor(exe.as_deref())
            });

        let staging_dir = non_empty_var("MAIL_PIPE_TMPDIR").map(PathBuf::from);

        Self {
            processor,
            staging_dir,
        }
    }
}

fn non_empty_var(key: &str) -> Option<OsString> {
    std::env::var_os(key).filter(|v| !v.is_empty())
}

/// Processor sitting beside `exe`, or a bare name resolved through `PATH`.
pub fn default_processor(exe: Option<&Path>) -> PathBuf {
    exe.and_then(Path::parent)
        .map(|dir| dir.join(DEFAULT_PROCESSOR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROCESSOR))
}
