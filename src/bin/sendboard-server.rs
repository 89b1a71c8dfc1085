//! sendboard HTTP API server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use sendboard::server::{AppState, Config, init_logging, router};

/// Serve send stores, leaderboards and trends over HTTP.
#[derive(Parser, Debug)]
#[command(name = "sendboard-server")]
#[command(about = "HTTP API for send scoring, leaderboards and trends")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "sendboard-server.toml", env = "SENDBOARD_CONFIG")]
    config: PathBuf,

    /// Override `[server] port` from the configuration file.
    #[arg(short, long, env = "SENDBOARD_PORT")]
    port: Option<u16>,

    /// Load the configuration and open every store, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    init_logging(&config.logging)?;

    let state = AppState::from_config(&config)?;
    tracing::info!(databases = ?state.database_names(), "stores opened");

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_addr()))?;

    if args.check {
        tracing::info!(config = %args.config.display(), %addr, "configuration ok");
        return Ok(());
    }

    tracing::info!(
        enabled = config.cors.enabled,
        origins = config.cors.allow_origins.len(),
        "cors policy"
    );
    let app = router(state)
        .layer(config.cors.layer())
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "cannot listen for Ctrl+C");
            }
        }
        _ = terminate => {}
    }

    tracing::info!("shutting down");
}
