//! QCV server binary entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use qcv_server::storage::run_retention_sweeper;
use qcv_server::telemetry::init_tracing;
use qcv_server::{AppState, Config, create_router};

/// Quantum circuit visualiser HTTP server.
#[derive(Debug, Parser)]
#[command(name = "qcv-server", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "QCV_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overriding the configuration (e.g. 127.0.0.1:8000)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.address = bind;
        config.validate()?;
    }

    init_tracing(&config.logging).context("failed to initialise tracing")?;

    let bind_addr = config.bind_address()?;
    let state = Arc::new(AppState::with_config(config));

    state.store.ensure_root()?;
    info!(dir = %state.store.root().display(), "Artifact directory ready");

    if let Some(retention) = state.config.storage.retention() {
        tokio::spawn(run_retention_sweeper(
            Arc::clone(&state.store),
            retention,
            state.config.storage.sweep_interval(),
        ));
    }

    let app = create_router(state);

    info!("Starting QCV server at http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
