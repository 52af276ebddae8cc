//! repo-scout: debounced GitHub repository search
//!
//! This is the main entry point for the application.

use anyhow::Result;
use repo_scout::{
    config,
    network::HttpClient,
    web::{create_router, AppState},
    GitHub, Orchestrator,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings_path = config::locate();
    let settings = config::load_from(settings_path.as_deref())?;

    // Initialize logging; RUST_LOG wins over the configured default
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting repo-scout v{}", repo_scout::VERSION);
    match settings_path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    info!(
        "Searching {} (language: {}, last {} days)",
        settings.search.endpoint, settings.search.language, settings.search.recency_days
    );

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Start the search orchestrator
    let source = Arc::new(GitHub::new(settings.search.endpoint.clone(), client));
    let (search, _orchestrator) = Orchestrator::new(settings.search.clone(), source).spawn();

    // Create application state
    let state = AppState::new(settings.clone(), search);
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
