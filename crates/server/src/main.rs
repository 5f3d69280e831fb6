mod api;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vodpool_core::{
    load_config, load_sites, validate_config, Aggregator, HttpTransport, MergedCatalog, Transport,
};

use api::create_router;
use state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("VODPOOL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Site list: {:?}", config.paths.sites);
    info!("Cache directory: {:?}", config.paths.cache_dir);

    // Load the source site list; without it there is nothing to query
    let sites = load_sites(&config.paths.sites)
        .with_context(|| format!("Failed to load site list from {:?}", config.paths.sites))?;
    info!("Loaded {} source sites", sites.len());

    // The cache directory must exist before the first purge
    std::fs::create_dir_all(&config.paths.cache_dir)
        .with_context(|| format!("Failed to create cache dir {:?}", config.paths.cache_dir))?;

    // Build the transport and aggregator
    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(&config.fetcher).context("Failed to create HTTP transport")?,
    );
    let aggregator = Aggregator::new(sites, transport, config.paths.cache_dir.clone());

    // Build the initial catalog from whatever cache files already
    // exist; an unreadable cache is not fatal at startup
    let initial = match aggregator.load_merged() {
        Ok(catalog) => {
            info!(
                "Initial catalog: {} titles, {} records",
                catalog.title_count(),
                catalog.total_records()
            );
            catalog
        }
        Err(e) => {
            warn!("Could not build initial catalog: {}", e);
            MergedCatalog::new()
        }
    };

    // Create app state and router
    let app_state = Arc::new(AppState::new(config.clone(), aggregator, initial));
    let app = create_router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
