//! HTTP preview server for quire sites.
//!
//! Serves a site built by `quire-site` without re-rendering anything:
//! - `GET /api/site`: site metadata
//! - `GET /api/navigation?route=…`: nav bar and sidebar with the active trail
//! - `GET /api/pages/{*path}`: resolve, lazily load and render one page
//! - `GET /assets/{file}`: content-addressed chunks, cached forever
//!
//! Page chunks go through one shared [`quire_loader::ChunkLoader`], so
//! concurrent requests for a cold page trigger a single read.
//!
//! # Quick Start
//!
//! ```no_run
//! use quire_config::Config;
//! use quire_server::run_server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None, None)?;
//!     run_server(config).await
//! }
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use quire_config::Config;
use quire_site::PageRegistry;
use state::AppState;

/// Run the server on a previously built site.
///
/// Loads the registry from the manifest in the configured output directory
/// and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or the server fails to
/// start.
pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let manifest_path = config.paths.manifest_path();
    let registry = PageRegistry::load_manifest(&manifest_path)?;
    tracing::info!(
        manifest = %manifest_path.display(),
        pages = registry.len(),
        "Loaded site"
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let state = Arc::new(AppState::new(config, registry));
    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
