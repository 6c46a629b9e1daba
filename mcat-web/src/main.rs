//! mcat-web - music catalog web service
//!
//! Serves the catalog's HTML pages and JSON API over a single SQLite database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mcat_common::config::{load_toml_config, CliOverrides, ServerConfig};
use mcat_common::db::init_database;
use mcat_common::CatalogStore;
use mcat_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mcat-web
#[derive(Parser, Debug)]
#[command(name = "mcat-web")]
#[command(about = "Music catalog web service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MCAT_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "MCAT_BIND")]
    bind: Option<String>,

    /// Folder holding mcat.db (overrides MCAT_ROOT_FOLDER and the config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "MCAT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcat_web=info,mcat_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mcat-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;
    let cli = CliOverrides {
        root_folder: args.root_folder,
        bind_address: args.bind,
        port: args.port,
    };
    let config = ServerConfig::resolve(&cli, &toml_config);

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path, config.busy_timeout)
        .await
        .context("Failed to initialize database")?;
    let store = CatalogStore::new(pool);

    let app = build_router(AppState::new(store.clone(), config.request_timeout));

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mcat-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
