//! Audio source search handler.

use super::{SearchResponse, SongRequest};
use crate::api::AppState;
use crate::error::Result;
use axum::{Json, extract::State};

/// POST /search - Find the audio source a download would use
#[utoipa::path(
    post,
    path = "/api/v1/search",
    tag = "search",
    request_body = SongRequest,
    responses(
        (status = 200, description = "First matching source", body = SearchResponse),
        (status = 400, description = "Song title or artist missing", body = crate::error::ApiError),
        (status = 404, description = "No matching source", body = crate::error::ApiError),
        (status = 503, description = "Audio tool unavailable", body = crate::error::ApiError)
    )
)]
pub async fn search_source(
    State(state): State<AppState>,
    Json(request): Json<SongRequest>,
) -> Result<Json<SearchResponse>> {
    let (song, source) = state.downloader.search(&request.song).await?;
    Ok(Json(SearchResponse { song, source }))
}
