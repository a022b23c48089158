//! Serve command - ingests the configured PDF and runs the HTTP API

use std::net::SocketAddr;

use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::infrastructure::observability::{init_metrics, init_tracing, shutdown_tracing};

/// Arguments for the serve command
#[derive(Args, Clone, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// PDF to ingest at startup (overrides config)
    #[arg(long)]
    pub pdf: Option<String>,
}

/// Run the API server
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let (mut config, problems) = super::load_config();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(pdf) = args.pdf {
        config.ingestion.pdf_path = pdf;
    }

    init_tracing(&config.logging, &config.observability.tracing);
    for problem in problems {
        warn!("{}", problem);
    }

    let metrics = init_metrics(&config.observability.metrics);
    let app = crate::create_app_with_config(&config)?;

    if config.ingestion.wait_for_completion {
        let status = app.ingestion.run().await;
        info!(status = status.name(), "Startup ingestion finished");
    } else {
        info!("Serving while ingestion runs in the background");
        app.ingestion.spawn();
    }

    let router = crate::api::create_router(app.state, metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracing();
    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
