use std::process::ExitCode;

use mail_pipe::config::PipeConfig;
use mail_pipe::error::PipeError;
use mail_pipe::pipeline::{DeliveryArgs, PipeAdapter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout belongs to the processor.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut argv = std::env::args_os();
    let program = argv
        .next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mail-pipe".to_string());

    let Some(args) = DeliveryArgs::from_args(argv) else {
        let err = PipeError::Usage { program };
        eprintln!("{err}");
        return ExitCode::from(err.exit_code());
    };

    let config = PipeConfig::from_env();
    tracing::debug!(
        processor = %config.processor.display(),
        staging_dir = ?config.staging_dir,
        "Configuration loaded"
    );

    let adapter = PipeAdapter::from_config(&config);
    let mut stdin = tokio::io::stdin();

    match adapter.deliver(&args, &mut stdin).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            tracing::error!(error = %e, code = e.exit_code(), "Delivery failed");
            ExitCode::from(e.exit_code())
        }
    }
}
