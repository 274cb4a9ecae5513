//! Pipe adapter: stage the message, run the processor, clean up on success.
//!
//! Flow:
//! 1. Create a uniquely named staged file
//! 2. Read the message from the input, drop its final byte, write it
//! 3. Run the processor on the staged file and wait for it
//! 4. Exit status zero → remove the staged file; anything else → keep it

use std::path::PathBuf;

use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

use crate::config::PipeConfig;
use crate::error::Result;
use crate::message::MessageSummary;
use crate::pipeline::processor::Processor;
use crate::pipeline::stage::{StagedMessage, read_message};
use crate::pipeline::types::{DeliveryArgs, DeliveryOutcome};

/// Hands one piped message at a time to the processor.
#[derive(Debug, Clone)]
pub struct PipeAdapter {
    processor: Processor,
    staging_dir: Option<PathBuf>,
}

impl PipeAdapter {
    /// Adapter for `processor`, staging in the platform temp dir.
    pub fn new(processor: Processor) -> Self {
        Self {
            processor,
            staging_dir: None,
        }
    }

    /// Adapter for the processor and staging dir named in `config`.
    pub fn from_config(config: &PipeConfig) -> Self {
        Self {
            processor: Processor::new(&config.processor),
            staging_dir: config.staging_dir.clone(),
        }
    }

    /// Stage files in `dir` instead of the platform temp dir.
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Deliver one message read from `input`.
    ///
    /// Errors are returned only when the processor never produced a status.
    /// A staging error removes the partial file; a spawn error keeps it.
    pub async fn deliver<R>(
        &self,
        args: &DeliveryArgs,
        input: &mut R,
    ) -> Result<DeliveryOutcome>
    where
        R: AsyncRead + Unpin,
    {
        let mut staged = StagedMessage::create(self.staging_dir.as_deref())?;
        let body = read_message(input).await?;
        staged.write(&body)?;

        let summary = MessageSummary::parse(&body);
        drop(body);

        debug!(
            path = %staged.path().display(),
            bytes = staged.len(),
            list = %args.list_name.to_string_lossy(),
            message_id = summary.id(),
            from = summary.from.as_deref().unwrap_or("-"),
            subject = summary.subject.as_deref().unwrap_or("-"),
            "Message staged"
        );

        let status = match self.processor.run(args, staged.path()).await {
            Ok(status) => status,
            Err(e) => {
                let kept = staged.keep();
                warn!(path = %kept.display(), message_id = summary.id(), "Staged message kept");
                return Err(e);
            }
        };

        if status.success() {
            let path = staged.path().to_path_buf();
            if let Err(e) = staged.discard() {
                warn!(path = %path.display(), error = %e, "Failed to remove staged message");
            }
            info!(
                list = %args.list_name.to_string_lossy(),
                message_id = summary.id(),
                "Message processed"
            );
            return Ok(DeliveryOutcome::Processed);
        }

        let kept = staged.keep();
        warn!(
            program = %self.processor.program().display(),
            %status,
            code = status.code(),
            path = %kept.display(),
            list = %args.list_name.to_string_lossy(),
            message_id = summary.id(),
            "Processor failed, staged message kept"
        );
        Ok(DeliveryOutcome::Failed { status, kept })
    }
}
