//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`metadata`] - Playlist/track metadata extraction
//! - [`search`] - Audio source lookup
//! - [`downloads`] - Single and batch downloads
//! - [`files`] - Serving finished files
//! - [`system`] - Health, capabilities, OpenAPI

use crate::types::{BatchJobState, SongDescriptor, SongInput, SourceLocator};
use serde::{Deserialize, Serialize};

mod downloads;
mod files;
mod metadata;
mod search;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use downloads::*;
pub use files::*;
pub use metadata::*;
pub use search::*;
pub use system::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Request body for POST /metadata/extract
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ExtractMetadataRequest {
    /// Public playlist or track URL
    #[serde(default)]
    pub url: String,
}

/// Request body for POST /search and POST /downloads/single
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SongRequest {
    /// Song to look up
    pub song: SongInput,
}

/// Response for POST /search
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    /// Normalized song
    pub song: SongDescriptor,
    /// First matching audio source
    pub source: SourceLocator,
}

/// Response for POST /downloads/batch
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BatchResponse {
    /// Aggregate and per-song state
    #[serde(flatten)]
    pub batch: BatchJobState,
    /// One-line outcome summary
    pub message: String,
}
