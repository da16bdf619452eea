//! ccmp-web - coffee chat mentorship site
//!
//! Serves the home, application and story gallery pages and forwards form
//! submissions to the remote record store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ccmp_common::airtable::AirtableClient;
use ccmp_common::config::{load_config, resolve_api_key};
use ccmp_web::{build_router, AppState, SiteSettings};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for ccmp-web
#[derive(Parser, Debug)]
#[command(name = "ccmp-web")]
#[command(about = "Coffee chat mentorship site")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides [server].host)
    #[arg(long, env = "CCMP_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides [server].port)
    #[arg(short, long, env = "CCMP_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("ccmp_web={level},ccmp_common={level},tower_http=info", level = config.logging.level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ccmp-web v{}", env!("CARGO_PKG_VERSION"));

    config.validate().context("Invalid configuration")?;
    let api_key = resolve_api_key(&config.airtable).context("Airtable API key not configured")?;

    let client = AirtableClient::from_config(&config.airtable, api_key)
        .context("Failed to create Airtable client")?;
    info!("Record store: {}", client.base_url());
    if let Some(secs) = config.airtable.request_timeout_secs {
        info!("Request timeout: {:?}", Duration::from_secs(secs));
    }

    let settings = SiteSettings::from_config(&config);
    if let Some(dir) = &settings.site_dir {
        info!("Serving static assets from {}", dir.display());
    }

    let state = AppState::new(Arc::new(client), settings);
    let app = build_router(state);

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("ccmp-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
