//! descry-server: HTTP gateway exposing the media description endpoints.
//!
//! Routes:
//! - GET /create-image, /create-audio, /create-text, /create-video —
//!   upload the fixed file of that kind, wait for the remote store to
//!   finish with it, ask the model for a description, return
//!   `{"response": text}`.
//! - GET /health — liveness check.
//!
//! Cross-origin requests are permitted from any origin. Every failure maps
//! to a 500 JSON body carrying the error message.

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tracing::info;

use descry_config::DescryConfig;

/// Shared immutable server state.
///
/// Read once at startup. Handlers build their own remote clients from it on
/// every request; requests share nothing mutable.
pub struct AppState {
    pub config: DescryConfig,
    pub api_key: String,
}

/// Build the axum router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/create-image", get(handlers::create_image))
        .route("/create-audio", get(handlers::create_audio))
        .route("/create-text", get(handlers::create_text))
        .route("/create-video", get(handlers::create_video))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server.
///
/// This is the main entry point for the gateway. It creates the axum
/// router, binds to the configured address, and serves requests until the
/// process exits.
pub async fn start_server(
    config: DescryConfig,
    api_key: String,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let port = port_override.unwrap_or(config.server.port);
    let host = config.server.host.clone();
    let media_dir = config.genai.media_dir.display().to_string();

    let state = Arc::new(AppState { config, api_key });
    let app = build_router(state);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("descry listening on {addr}");
    info!("  Media dir: {media_dir}");
    for kind in descry_types::MediaKind::ALL {
        info!("  GET http://{addr}/create-{kind}");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
