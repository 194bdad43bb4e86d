//! Playlist download service split into focused submodules.
//!
//! The `PlaylistDownloader` struct and its methods are organized by domain:
//! - [`batch`] - Windowed batch downloads and archive packaging
//! - [`single`] - Source search and single-song downloads
//! - [`files`] - Lookup of served files
//! - [`retention`] - Expiry of old served files

mod batch;
mod files;
mod retention;
mod single;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use batch::DEFAULT_COLLECTION_NAME;
pub use files::ServedFile;
pub use retention::RETENTION_SWEEP_INTERVAL;

use crate::config::Config;
use crate::error::Result;
use crate::materialize::Materializer;
use crate::metadata::{MetadataProvider, SpotifyClient};
use crate::pipeline::SongPipeline;
use crate::source::{AudioFetcher, SourceResolver};
use crate::tools::{self, AudioToolBackend};
use crate::types::{Capabilities, ExtractedMetadata};
use std::sync::Arc;

/// Main service object (cloneable - all fields are Arc-wrapped or cheap)
#[derive(Clone)]
pub struct PlaylistDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Audio search/fetch backend (trait object for pluggable implementations)
    pub(crate) backend: Arc<dyn AudioToolBackend>,
    /// Metadata collaborator
    pub(crate) metadata: Arc<dyn MetadataProvider>,
    /// Per-song pipeline shared by batch and single downloads
    pub(crate) pipeline: SongPipeline,
}

impl PlaylistDownloader {
    /// Create a downloader from configuration
    ///
    /// Discovers `yt-dlp` (explicit path first, then PATH when enabled) and
    /// falls back to a backend that rejects downloads when none is found, so
    /// metadata extraction keeps working without the tool.
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration is invalid, `Error::Network` if the
    /// HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let backend = tools::backend_from_config(&config.tools);
        let metadata: Arc<dyn MetadataProvider> =
            Arc::new(SpotifyClient::new(config.metadata.clone())?);

        tracing::info!(
            backend = backend.name(),
            metadata_configured = metadata.is_configured(),
            window = config.download.max_concurrent_downloads,
            "playlist downloader initialized"
        );

        Ok(Self::with_components(config, backend, metadata))
    }

    /// Create a downloader with explicit collaborators (used by tests and
    /// embedders providing their own backends)
    pub fn with_components(
        config: Config,
        backend: Arc<dyn AudioToolBackend>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        let materializer = Materializer::new(
            config.server.api.public_base_url.clone(),
            config.download.output_dir.clone(),
        );
        let pipeline = SongPipeline::new(
            SourceResolver::new(backend.clone()),
            AudioFetcher::new(
                backend.clone(),
                config.download.audio_format.clone(),
                config.download.audio_quality.clone(),
            ),
            materializer,
        );

        Self {
            config: Arc::new(config),
            backend,
            metadata,
            pipeline,
        }
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Resolve a playlist/track reference into song descriptors
    pub async fn extract_metadata(&self, reference: &str) -> Result<ExtractedMetadata> {
        if reference.trim().is_empty() {
            return Err(crate::Error::Validation("URL is required".into()));
        }
        self.metadata.extract(reference).await
    }

    /// Query what this instance can currently do
    ///
    /// Probes the audio tool with a version request.
    pub async fn capabilities(&self) -> Capabilities {
        let version = match self.backend.version().await {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::debug!(error = %e, "audio tool probe failed");
                None
            }
        };

        Capabilities {
            backend: self.backend.name().to_string(),
            available: version.is_some(),
            version,
            metadata_configured: self.metadata.is_configured(),
            max_concurrent_downloads: self.config.download.max_concurrent_downloads,
        }
    }

    /// Fail fast when the audio tool cannot run
    pub(crate) async fn ensure_tool_available(&self) -> Result<()> {
        let version = self.backend.version().await?;
        tracing::debug!(backend = self.backend.name(), %version, "audio tool available");
        Ok(())
    }
}
