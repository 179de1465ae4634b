//! `faultline-notify`: send a single error report from the command line.
//!
//! Usage: `faultline-notify <id> <context> <error>`
//!
//! Payloads are consumed in-process and printed as JSON lines on stdout,
//! which makes the binary handy for checking a service's configuration
//! and the wire schema without a collector.

use std::process::ExitCode;
use std::sync::Arc;

use faultline_client::{ChannelProducer, ConfigError, Producer, Reporter, ReporterError};
use faultline_types::{EventDecoder, ReportEventSchema};
use tracing_subscriber::EnvFilter;

/// The error text given on the command line.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct ReportedError(String);

#[derive(Debug, thiserror::Error)]
enum NotifyError {
    #[error("usage: faultline-notify <id> <context> <error>")]
    Usage,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reporter(#[from] ReporterError),

    #[error("outbound consumer failed: {0}")]
    Consumer(#[from] tokio::task::JoinError),
}

fn resolve_config_path() -> String {
    std::env::var("FAULTLINE_CONFIG_PATH")
        .ok()
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| "faultline.toml".to_string())
}

async fn run(args: Vec<String>) -> Result<(), NotifyError> {
    let [id, context, message] = <[String; 3]>::try_from(args).map_err(|_| NotifyError::Usage)?;

    let config_path = resolve_config_path();
    let config = faultline_client::load_config(Some(config_path.as_str()))?;

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::info!(path = %config_path, "resolved configuration path");

    let (producer, mut outbound) = ChannelProducer::new(config.reporter.channel_capacity);
    let consumer = tokio::spawn(async move {
        while let Some(payload) = outbound.recv().await {
            match ReportEventSchema.decode(&payload) {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::error!(error = %e, "failed to render report event"),
                },
                Err(e) => tracing::error!(error = %e, bytes = payload.len(), "undecodable payload"),
            }
        }
    });

    let producer: Arc<dyn Producer> = Arc::new(producer);
    let reporter = Reporter::from_config(&config.reporter, Some(producer))?;

    let outcome = reporter
        .notify(&id, &context, &ReportedError(message))
        .await;
    reporter.close(None).await?;
    consumer.await?;

    outcome.map_err(NotifyError::from)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("faultline-notify: {e}");
            ExitCode::FAILURE
        }
    }
}
