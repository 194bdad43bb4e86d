//! Download handlers.

use super::{BatchResponse, SongRequest};
use crate::api::AppState;
use crate::error::Result;
use crate::types::{BatchRequest, SingleDownload};
use axum::{Json, extract::State};

/// POST /downloads/single - Download one song
#[utoipa::path(
    post,
    path = "/api/v1/downloads/single",
    tag = "downloads",
    request_body = SongRequest,
    responses(
        (status = 200, description = "Song downloaded", body = SingleDownload),
        (status = 400, description = "Song title or artist missing", body = crate::error::ApiError),
        (status = 404, description = "No matching source", body = crate::error::ApiError),
        (status = 502, description = "Audio tool failed to download", body = crate::error::ApiError),
        (status = 503, description = "Audio tool unavailable", body = crate::error::ApiError)
    )
)]
pub async fn download_single(
    State(state): State<AppState>,
    Json(request): Json<SongRequest>,
) -> Result<Json<SingleDownload>> {
    let download = state.downloader.download_single(&request.song).await?;
    Ok(Json(download))
}

/// POST /downloads/batch - Download a list of songs
///
/// Returns 200 once every song has settled, even when some of them failed;
/// failures are listed per song.
#[utoipa::path(
    post,
    path = "/api/v1/downloads/batch",
    tag = "downloads",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Batch processed (individual songs may have failed)", body = BatchResponse),
        (status = 400, description = "No valid songs in request", body = crate::error::ApiError),
        (status = 500, description = "Workspace could not be created", body = crate::error::ApiError),
        (status = 503, description = "Audio tool unavailable", body = crate::error::ApiError)
    )
)]
pub async fn download_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>> {
    let batch = state.downloader.download_batch(request).await?;
    let message = format!("Playlist processing completed. {}", batch.summary());
    Ok(Json(BatchResponse { batch, message }))
}
