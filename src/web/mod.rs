mod pages;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::bsky::{BlueskyClient, FeedSource};
use crate::config::Config;

/// Shared application state.
///
/// Holds only immutable data: the transport (whose connection pool is
/// internally synchronized) and the configuration.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FeedSource>,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(source: Arc<dyn FeedSource>, config: Config) -> Self {
        Self {
            source,
            config: Arc::new(config),
        }
    }
}

/// Start the web server and run until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails to bind or crashes.
pub async fn serve<F>(config: Config, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let client = BlueskyClient::new(&config).context("Failed to build HTTP client")?;
    let state = AppState::new(Arc::new(client), config);
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
