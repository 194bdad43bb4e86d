//! REST API server module
//!
//! Exposes metadata extraction, source search, single and batch downloads
//! and file serving under `/api/v1`.

use crate::{Config, PlaylistDownloader, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Prefix every route is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// Create the API router with all route definitions
///
/// # Routes (under `/api/v1`)
///
/// ## Metadata
/// - `POST /metadata/extract` - Resolve a playlist or track URL into songs
///
/// ## Search
/// - `POST /search` - Locate the audio source for one song
///
/// ## Downloads
/// - `POST /downloads/single` - Download one song
/// - `POST /downloads/batch` - Download a list of songs in windows
///
/// ## Files
/// - `GET /files/download/:filename` - Stream a finished file
///
/// ## System
/// - `GET /capabilities` - Tool availability and limits
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled, at the root)
pub fn create_router(downloader: Arc<PlaylistDownloader>, config: Arc<Config>) -> Router {
    let state = AppState::new(downloader, config.clone());

    let api = Router::new()
        // Metadata
        .route("/metadata/extract", post(routes::extract_metadata))
        // Search
        .route("/search", post(routes::search_source))
        // Downloads
        .route("/downloads/single", post(routes::download_single))
        .route("/downloads/batch", post(routes::download_batch))
        // Files
        .route("/files/download/:filename", get(routes::download_file))
        // System
        .route("/capabilities", get(routes::get_capabilities))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    let router = Router::new().nest(API_PREFIX, api);

    // Swagger UI is merged before state is applied and serves the OpenAPI document itself
    let router = if config.server.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` or an empty list allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until the server stops. Use [`crate::run_with_shutdown`] to stop it
/// on SIGINT/SIGTERM.
///
/// # Example
///
/// ```no_run
/// use playlist_dl::{Config, PlaylistDownloader};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::from_env()?);
/// let downloader = Arc::new(PlaylistDownloader::new((*config).clone())?);
///
/// // Start API server (blocks until shutdown)
/// playlist_dl::api::start_api_server(downloader, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(
    downloader: Arc<PlaylistDownloader>,
    config: Arc<Config>,
) -> Result<()> {
    serve(downloader, config, std::future::pending()).await
}

/// Serve the API until `shutdown` resolves, then drain in-flight requests
pub async fn serve<F>(
    downloader: Arc<PlaylistDownloader>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let bind_address = config.server.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(downloader, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
