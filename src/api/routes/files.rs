//! Finished-file serving handler.

use crate::api::AppState;
use crate::error::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// GET /files/download/{filename} - Stream a finished file
#[utoipa::path(
    get,
    path = "/api/v1/files/download/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Served filename from a download URL")
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 400, description = "Filename contains path components", body = crate::error::ApiError),
        (status = 403, description = "File type not servable", body = crate::error::ApiError),
        (status = 404, description = "File not found", body = crate::error::ApiError)
    )
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let served = state.downloader.served_file(&filename).await?;
    let file = tokio::fs::File::open(&served.path).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        served.filename.replace('"', "")
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, served.mime_type.to_string()),
            (header::CONTENT_LENGTH, served.size.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
