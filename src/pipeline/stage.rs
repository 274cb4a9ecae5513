//! Staged message file: the on-disk copy handed to the processor by path.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::error;

use crate::error::StageError;

/// Name prefix of staged files, so kept ones are easy to find.
const STAGED_PREFIX: &str = "mail-pipe.";

/// Read the whole message and drop its final byte.
///
/// The MTA terminates the piped message with one delimiter byte. Exactly one
/// byte is removed whatever it is; empty input stays empty.
pub async fn read_message<R>(reader: &mut R) -> Result<Vec<u8>, StageError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .await
        .map_err(StageError::Read)?;
    buf.pop();
    Ok(buf)
}

/// A uniquely named temp file holding one message.
///
/// Dropping it without [`keep`](Self::keep) removes the file.
#[derive(Debug)]
pub struct StagedMessage {
    file: NamedTempFile,
    len: usize,
}

impl StagedMessage {
    /// Create an empty staged file in `dir`, or the platform temp dir.
    ///
    /// Creation is exclusive (`O_EXCL`, mode 0600) with a random name, so
    /// concurrent deliveries never share a file.
    pub fn create(dir: Option<&Path>) -> Result<Self, StageError> {
        let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        let file = Builder::new()
            .prefix(STAGED_PREFIX)
            .tempfile_in(&dir)
            .map_err(|source| StageError::Create { dir, source })?;
        Ok(Self { file, len: 0 })
    }

    /// Write the message body. Called once per staged file.
    pub fn write(&mut self, body: &[u8]) -> Result<(), StageError> {
        let path = self.file.path().to_path_buf();
        let file = self.file.as_file_mut();
        file.write_all(body)
            .and_then(|()| file.flush())
            .map_err(|source| StageError::Write { path, source })?;
        self.len += body.len();
        Ok(())
    }

    /// Location of the staged file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written yet (or the message was empty).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove the staged file.
    pub fn discard(self) -> std::io::Result<()> {
        self.file.close()
    }

    /// Leave the staged file on disk and return its path.
    ///
    /// The file handle is closed first. If the path cannot be disarmed it is
    /// leaked rather than dropped, so the file survives either way.
    pub fn keep(self) -> PathBuf {
        match self.file.into_temp_path().keep() {
            Ok(path) => path,
            Err(e) => {
                let path = e.path.to_path_buf();
                error!(
                    path = %path.display(),
                    error = %e.error,
                    "Failed to disarm staged message cleanup"
                );
                std::mem::forget(e.path);
                path
            }
        }
    }
}
