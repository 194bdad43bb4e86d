//! Metadata extraction handler.

use super::ExtractMetadataRequest;
use crate::api::AppState;
use crate::error::Result;
use crate::types::ExtractedMetadata;
use axum::{Json, extract::State};

/// POST /metadata/extract - Resolve a playlist or track URL into songs
#[utoipa::path(
    post,
    path = "/api/v1/metadata/extract",
    tag = "metadata",
    request_body = ExtractMetadataRequest,
    responses(
        (status = 200, description = "Songs for the reference", body = ExtractedMetadata),
        (status = 400, description = "Missing or malformed URL", body = crate::error::ApiError),
        (status = 401, description = "Metadata credentials missing or rejected", body = crate::error::ApiError),
        (status = 404, description = "Playlist or track not found", body = crate::error::ApiError),
        (status = 429, description = "Metadata service rate limit", body = crate::error::ApiError)
    )
)]
pub async fn extract_metadata(
    State(state): State<AppState>,
    Json(request): Json<ExtractMetadataRequest>,
) -> Result<Json<ExtractedMetadata>> {
    let metadata = state.downloader.extract_metadata(&request.url).await?;
    Ok(Json(metadata))
}
