//! HTTP error response handling for the API
//!
//! Converts domain errors to HTTP responses with the status from
//! [`ToHttpStatus`] and an [`ApiError`] JSON body.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Implement IntoResponse for Error to automatically convert errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let retry_after = match &self {
            Error::Metadata(crate::error::MetadataError::RateLimited {
                retry_after: Some(secs),
            }) => Some(*secs),
            _ => None,
        };

        if status_code.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }

        let api_error: ApiError = self.into();
        let mut response = (status_code, Json(api_error)).into_response();

        if let Some(secs) = retry_after
            && let Ok(value) = HeaderValue::from_str(&secs.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}

/// Implement IntoResponse for ApiError for explicit error responses
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Errors normally go through Error::into_response, which knows the status
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MetadataError, SongError};

    async fn body_of(response: Response) -> ApiError {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_bad_request() {
        let response = Error::Validation("no songs".into()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let api_error = body_of(response).await;
        assert_eq!(api_error.error.code, "validation_error");
        assert!(api_error.error.message.contains("no songs"));
    }

    #[tokio::test]
    async fn tool_unavailable_is_service_unavailable() {
        let response =
            Error::Song(SongError::ToolUnavailable("yt-dlp missing".into())).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_of(response).await.error.code, "tool_unavailable");
    }

    #[tokio::test]
    async fn rate_limit_sets_retry_after_header() {
        let response = Error::Metadata(MetadataError::RateLimited {
            retry_after: Some(12),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "12");
    }

    #[tokio::test]
    async fn source_not_found_carries_query_details() {
        let response = Error::Song(SongError::SourceNotFound {
            query: "Artist A Song A".into(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let api_error = body_of(response).await;
        assert_eq!(api_error.error.details.unwrap()["query"], "Artist A Song A");
    }

    #[tokio::test]
    async fn direct_api_error_defaults_to_internal() {
        let response = ApiError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
