//! museum-api - museum management REST service
//!
//! Serves the visitor, supervisor and employee API over a SQLite database in
//! the root folder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use museum_common::api::load_signing_secret;
use museum_common::config::{CliOverrides, ServiceConfig, TomlConfig};
use museum_common::db::init_database;
use museum_api::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for museum-api
#[derive(Parser, Debug)]
#[command(name = "museum-api")]
#[command(about = "Museum management REST service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MUSEUM_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "MUSEUM_BIND")]
    bind: Option<String>,

    /// Folder holding museum.db
    #[arg(short, long, env = "MUSEUM_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Require a bearer access token on mutating routes
    #[arg(long, env = "MUSEUM_REQUIRE_AUTH")]
    require_auth: Option<bool>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "MUSEUM_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "museum_api=info,museum_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting museum-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let file = TomlConfig::load_or_default(args.config.as_deref());
    let config = ServiceConfig::resolve(
        CliOverrides {
            root_folder: args.root_folder,
            bind: args.bind,
            port: args.port,
            require_auth: args.require_auth,
        },
        file,
    );

    config
        .ensure_root_folder()
        .with_context(|| format!("Failed to create root folder {}", config.root_folder.display()))?;

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let signing_secret = load_signing_secret(&pool)
        .await
        .context("Failed to load token signing secret")?;
    info!("Loaded token signing secret");

    if config.require_auth {
        info!("Bearer tokens required on mutating routes");
    } else {
        info!("Bearer tokens optional (require_auth = false)");
    }

    let addr = config.listen_addr();
    let state = AppState::new(pool, config, signing_secret);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("museum-api listening on http://{}", addr);
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
