//! OpenAPI documentation and schema generation
//!
//! The specification is generated at compile time with utoipa.

use utoipa::OpenApi;

/// OpenAPI documentation for the playlist-dl REST API
///
/// The spec can be accessed via:
/// - `/api/v1/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "playlist-dl REST API",
        version = "0.1.0",
        description = "Resolve playlists into songs, locate audio sources and download them individually or in bounded-concurrency batches",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Metadata
        crate::api::routes::extract_metadata,

        // Search
        crate::api::routes::search_source,

        // Downloads
        crate::api::routes::download_single,
        crate::api::routes::download_batch,

        // Files
        crate::api::routes::download_file,

        // System
        crate::api::routes::get_capabilities,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::SongDescriptor,
        crate::types::SourceLocator,
        crate::types::SongStatus,
        crate::types::DownloadHandle,
        crate::types::SongJobState,
        crate::types::BatchStatus,
        crate::types::BatchJobState,
        crate::types::ReferenceKind,
        crate::types::ExtractedMetadata,
        crate::types::SingleDownload,
        crate::types::Capabilities,
        crate::types::SongInput,
        crate::types::BatchRequest,

        // API request/response types
        crate::api::routes::ExtractMetadataRequest,
        crate::api::routes::SongRequest,
        crate::api::routes::SearchResponse,
        crate::api::routes::BatchResponse,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "metadata", description = "Metadata - Resolve playlist and track URLs into songs"),
        (name = "search", description = "Search - Locate the audio source for a song"),
        (name = "downloads", description = "Downloads - Single songs and windowed batches"),
        (name = "files", description = "Files - Fetch finished audio files and archives"),
        (name = "system", description = "System endpoints - Health checks, capabilities, OpenAPI spec"),
    )
)]
pub struct ApiDoc;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/v1/metadata/extract",
            "/api/v1/search",
            "/api/v1/downloads/single",
            "/api/v1/downloads/batch",
            "/api/v1/files/download/{filename}",
            "/api/v1/capabilities",
            "/api/v1/health",
            "/api/v1/openapi.json",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_has_batch_schemas() {
        let components = ApiDoc::openapi().components.unwrap();
        for schema in ["BatchRequest", "BatchResponse", "SongJobState", "ApiError"] {
            assert!(components.schemas.contains_key(schema), "missing {schema}");
        }
    }

    #[test]
    fn spec_info_and_tags() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "playlist-dl REST API");

        let tags = spec.tags.unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"downloads"));
        assert!(names.contains(&"system"));
    }
}
