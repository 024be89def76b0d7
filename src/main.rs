#![forbid(unsafe_code)]
use std::path::PathBuf;
use std::sync::Arc;

use accounts::config::Configuration;
use accounts::telemetry::{setup_logging, setup_metrics_recorder};
use accounts::{app, initialize_state};
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Account registry HTTP server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the `config.yaml` file.
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // logging is configured by the file itself, report its loading on stderr.
    let bootstrap = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let config: Arc<Configuration> = tracing::subscriber::with_default(bootstrap, || {
        Configuration::default()
            .path(args.config.unwrap_or_default())
            .read()
    })?;

    setup_logging(&config.log)?;

    let mut state = initialize_state(Arc::clone(&config)).await?;
    match setup_metrics_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(err) => tracing::warn!(error = %err, "metrics recorder not installed"),
    }

    let shutdown = state.shutdown.clone();
    let listener = TcpListener::bind((config.address.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

/// Wait for Ctrl+C, then cancel in-flight work.
async fn shutdown_signal(token: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
    }

    tracing::info!("shutting down");
    token.cancel();
}
