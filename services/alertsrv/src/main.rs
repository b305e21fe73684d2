//! alertsrv entry point

use std::path::PathBuf;

use alertsrv::{api, AlertConfig, AppState};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "alertsrv - webhook alert ingestion service")]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,
    /// Validate configuration and probe the backend
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config =
        AlertConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = alertsrv::logging::init(&config.logging)?;

    info!("Starting alertsrv v{}", env!("CARGO_PKG_VERSION"));

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_service(config).await,
        Commands::Check => check_config(config).await,
    }
}

async fn run_service(config: AlertConfig) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr();
    let state = AppState::from_config(config)
        .await
        .context("Failed to initialize backend")?;
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("API server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    info!("alertsrv stopped");
    Ok(())
}

async fn check_config(config: AlertConfig) -> anyhow::Result<()> {
    info!("Configuration OK");
    info!("  listen: {}", config.bind_addr());
    info!("  backend kind: {:?}", config.backend.kind);
    info!(
        "  index: {} (max {} alerts)",
        config.alerts.index_key, config.alerts.max_alerts
    );

    let state = AppState::from_config(config)
        .await
        .context("Failed to initialize backend")?;
    if !state.backend().is_configured() {
        info!("No backend configured, skipping probe");
        return Ok(());
    }

    match state.store.probe().await {
        Ok(report) => {
            info!(
                "Backend {} reachable, read back {:?}, {} keys",
                report.backend,
                report.get,
                report.keys.len()
            );
            Ok(())
        },
        Err(e) => {
            error!("Backend probe failed: {}", e);
            Err(e).context("Backend check failed")
        },
    }
}

/// Ctrl+C or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let term_signal = match signal(SignalKind::terminate()) {
            Ok(sig) => Some(sig),
            Err(e) => {
                tracing::warn!(
                    "Failed to install SIGTERM handler: {}. Service will only respond to Ctrl+C",
                    e
                );
                None
            },
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = async {
                if let Some(mut sig) = term_signal {
                    sig.recv().await;
                } else {
                    std::future::pending::<()>().await
                }
            } => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received");
}
