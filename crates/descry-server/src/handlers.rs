//! HTTP endpoint handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, info};

use descry_genai::{FileStoreClient, GenAiError, GenerativeClient, PollPolicy};
use descry_types::MediaKind;

use crate::AppState;

/// GET /create-image — upload and describe the fixed image file.
pub async fn create_image(State(state): State<Arc<AppState>>) -> Response {
    create_media(&state, MediaKind::Image).await
}

/// GET /create-audio — upload, poll, and describe the fixed audio file.
pub async fn create_audio(State(state): State<Arc<AppState>>) -> Response {
    create_media(&state, MediaKind::Audio).await
}

/// GET /create-text — upload and describe the fixed text file.
pub async fn create_text(State(state): State<Arc<AppState>>) -> Response {
    create_media(&state, MediaKind::Text).await
}

/// GET /create-video — upload, poll, and describe the fixed video file.
pub async fn create_video(State(state): State<Arc<AppState>>) -> Response {
    create_media(&state, MediaKind::Video).await
}

/// GET /health — simple HTTP health check.
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Shared path for the four endpoints. Any error becomes a uniform 500
/// carrying the error message.
async fn create_media(state: &AppState, kind: MediaKind) -> Response {
    match describe_media(state, kind).await {
        Ok(text) => {
            info!(%kind, "description complete");
            Json(json!({ "response": text })).into_response()
        }
        Err(e) => {
            error!(%kind, "request failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Upload the fixed file for `kind`, wait for readiness, describe it.
async fn describe_media(state: &AppState, kind: MediaKind) -> Result<String, GenAiError> {
    let genai = &state.config.genai;

    // Per-request clients; requests operate only on their own remote resource.
    let store =
        FileStoreClient::new(&genai.base_url, &state.api_key).with_poll_policy(PollPolicy {
            interval: Duration::from_secs(genai.poll_interval_secs),
            max_checks: genai.max_poll_checks,
        });
    let model = GenerativeClient::new(&genai.base_url, &state.api_key, &genai.model);

    let path = genai.media_dir.join(kind.file_name());
    let file = store.await_ready(kind, &path).await?;
    model
        .describe_file(kind.prompt(), &file.uri, &file.mime_type)
        .await
}
