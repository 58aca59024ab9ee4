//! Request handlers for the upload service.
//!
//! The handlers are thin by design: they parse the multipart request, enforce
//! the body ceiling, and delegate validation and scheduling to the
//! [`UploadOrchestrator`]. Every failure path renders the central
//! [`Error`](imgsink_core::Error) as a JSON body with the matching status
//! code.

use crate::server::upload::UploadOrchestrator;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    routing::{get, post},
};
use bytes::Bytes;
use imgsink_core::{Error, MAX_UPLOAD_BYTES, Result, UploadResponse};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// State shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub uploads: Arc<UploadOrchestrator>,
}

/// Assembles the application router: upload endpoint, liveness probe, body
/// ceiling, and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /upload` - multipart field `image`, JPEG only, capped at 8192 KiB.
///
/// Returns `200` with the assigned identifier the moment the processing task
/// is admitted; rescaling and persistence happen asynchronously afterwards.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let payload = read_image_field(&mut multipart).await?;
    state.uploads.validate(&payload)?;
    let image_id = state.uploads.accept(payload).await?;
    tracing::info!(%image_id, "upload accepted");
    Ok(Json(UploadResponse { image_id }))
}

/// Pulls the `image` part out of the multipart stream, skipping unrelated
/// fields.
async fn read_image_field(multipart: &mut Multipart) -> Result<Bytes> {
    loop {
        let Some(field) = multipart.next_field().await.map_err(map_multipart_err)? else {
            return Err(Error::InvalidRequest {
                reason: "missing `image` field".into(),
            });
        };
        if field.name() == Some("image") {
            return field.bytes().await.map_err(map_multipart_err);
        }
    }
}

fn map_multipart_err(err: MultipartError) -> Error {
    // Exceeding the body ceiling surfaces as a length-limit read error; keep
    // the contract's 413 for that case, everything else is a malformed
    // request.
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::SizeLimitExceeded
    } else {
        Error::InvalidRequest {
            reason: err.body_text(),
        }
    }
}
