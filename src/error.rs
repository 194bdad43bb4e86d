//! Error types for playlist-dl
//!
//! This module provides the error taxonomy for the library, including:
//! - Per-song errors that end a single pipeline (source lookup, tool, fetch)
//! - Batch-level faults (validation, workspace allocation)
//! - Metadata collaborator failures
//! - HTTP status code mapping and structured error bodies for the REST API

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for playlist-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for playlist-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_concurrent_downloads")
        key: Option<String>,
    },

    /// Request rejected before any work was attempted
    #[error("invalid input: {0}")]
    Validation(String),

    /// Metadata service failure
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Failure scoped to a single song (search, tool, fetch)
    #[error("{0}")]
    Song(#[from] SongError),

    /// Temporary workspace could not be allocated
    #[error("workspace error at {path}: {reason}")]
    Workspace {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Archive could not be written
    #[error("failed to write archive {path}: {reason}")]
    ArchiveWrite {
        /// Archive output path
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Requested served file does not exist
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// Requested file is outside the servable allow-list
    #[error("file type not allowed: {0}")]
    UnsupportedFileType(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Errors reported by the metadata collaborator
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Track or playlist does not exist or is not accessible
    #[error("{0}")]
    NotFound(String),

    /// Reference string is not a recognised track/playlist URL
    #[error("invalid reference format: {0}")]
    InvalidFormat(String),

    /// Credentials missing or rejected
    #[error("failed to authenticate with metadata service: {0}")]
    Unauthenticated(String),

    /// Upstream rate limit hit
    #[error("metadata service rate limit exceeded")]
    RateLimited {
        /// Seconds suggested by the upstream `Retry-After` header
        retry_after: Option<u64>,
    },

    /// Any other upstream failure
    #[error("metadata service failure: {0}")]
    Upstream(String),
}

/// Errors that terminate one song's pipeline
#[derive(Debug, Error)]
pub enum SongError {
    /// The search tool returned zero results
    #[error("no audio source found for: {query}")]
    SourceNotFound {
        /// The query that was searched
        query: String,
    },

    /// The external tool is missing or broken
    #[error("audio tool unavailable: {0}")]
    ToolUnavailable(String),

    /// The external tool exited non-zero while fetching
    #[error("download failed: {reason}")]
    FetchFailed {
        /// Captured stderr or spawn failure
        reason: String,
    },

    /// The tool reported success but no matching file exists on disk
    #[error("downloaded file not found for {stem} in {dir}")]
    FileNotProduced {
        /// Directory that was searched
        dir: PathBuf,
        /// Filename stem that was expected
        stem: String,
    },
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "source_not_found",
///     "message": "no audio source found for: Artist A Song A",
///     "details": { "query": "Artist A Song A" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "validation_error", "tool_unavailable")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - rejected, nothing attempted
            Error::Config { .. } => 400,
            Error::Validation(_) => 400,
            Error::Metadata(MetadataError::InvalidFormat(_)) => 400,

            // 401 / 403
            Error::Metadata(MetadataError::Unauthenticated(_)) => 401,
            Error::UnsupportedFileType(_) => 403,

            // 404 Not Found
            Error::Metadata(MetadataError::NotFound(_)) => 404,
            Error::Song(SongError::SourceNotFound { .. }) => 404,
            Error::FileNotFound(_) => 404,

            // 429 Too Many Requests
            Error::Metadata(MetadataError::RateLimited { .. }) => 429,

            // 500 Internal Server Error - infrastructure failures
            Error::Song(SongError::FileNotProduced { .. }) => 500,
            Error::Workspace { .. } => 500,
            Error::ArchiveWrite { .. } => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            // 502 Bad Gateway - external collaborator failed
            Error::Metadata(MetadataError::Upstream(_)) => 502,
            Error::Song(SongError::FetchFailed { .. }) => 502,
            Error::Network(_) => 502,

            // 503 Service Unavailable
            Error::Song(SongError::ToolUnavailable(_)) => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "validation_error",
            Error::Metadata(e) => match e {
                MetadataError::NotFound(_) => "metadata_not_found",
                MetadataError::InvalidFormat(_) => "invalid_reference",
                MetadataError::Unauthenticated(_) => "unauthenticated",
                MetadataError::RateLimited { .. } => "rate_limited",
                MetadataError::Upstream(_) => "metadata_upstream_error",
            },
            Error::Song(e) => match e {
                SongError::SourceNotFound { .. } => "source_not_found",
                SongError::ToolUnavailable(_) => "tool_unavailable",
                SongError::FetchFailed { .. } => "fetch_failed",
                SongError::FileNotProduced { .. } => "file_not_produced",
            },
            Error::Workspace { .. } => "workspace_error",
            Error::ArchiveWrite { .. } => "archive_write_error",
            Error::FileNotFound(_) => "file_not_found",
            Error::UnsupportedFileType(_) => "unsupported_file_type",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Song(SongError::SourceNotFound { query }) => Some(serde_json::json!({
                "query": query,
            })),
            Error::Song(SongError::FileNotProduced { dir, stem }) => Some(serde_json::json!({
                "dir": dir,
                "stem": stem,
            })),
            Error::Metadata(MetadataError::RateLimited {
                retry_after: Some(secs),
            }) => Some(serde_json::json!({
                "retry_after_seconds": secs,
            })),
            Error::Workspace { path, .. } => Some(serde_json::json!({
                "path": path,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
