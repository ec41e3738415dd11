//! Draft storage service (dsm-drafts) - Main entry point
//!
//! Serves the per-user draft API for the decision-support method pages.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dsm_common::config::{default_config_path, TomlConfig};
use dsm_drafts::config::{Overrides, ServerConfig};
use dsm_drafts::{build_router, db, AppState};

/// Command-line arguments for dsm-drafts
#[derive(Parser, Debug)]
#[command(name = "dsm-drafts")]
#[command(about = "Draft storage service for decision-support methods")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "DSM_DRAFTS_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "DSM_DATABASE")]
    database: Option<PathBuf>,

    /// Root folder for module data
    #[arg(short, long, env = "DSM_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// TOML config file (defaults to <config_dir>/dsm/dsm-drafts.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = match args.config.clone().or_else(|| default_config_path("dsm-drafts")) {
        Some(path) => TomlConfig::load_optional(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => None,
    };

    let config = ServerConfig::resolve(
        &Overrides {
            port: args.port,
            database: args.database,
            root_folder: args.root_folder,
            log_level: args.log_level,
        },
        toml.as_ref(),
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("dsm_drafts={0},dsm_common={0},tower_http={0}", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting dsm-drafts v{} on port {}",
        env!("CARGO_PKG_VERSION"),
        config.port
    );
    info!("Root folder: {}", config.root_folder.display());

    let pool = db::open_database(&config.database_path)
        .await
        .context("Failed to open draft database")?;

    let app = build_router(AppState::new(pool));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

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
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
