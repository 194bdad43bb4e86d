//! # playlist-dl
//!
//! Backend library that turns playlist and track references into downloaded
//! audio files.
//!
//! ## Overview
//!
//! playlist-dl:
//! - **Resolves metadata** - Playlist and track URLs become ordered song lists
//! - **Finds sources** - Each song is matched to one audio source via yt-dlp
//! - **Downloads in windows** - At most `max_concurrent_downloads` songs run at
//!   once; the next window starts when the previous one has fully settled
//! - **Isolates failures** - One failed song never fails the batch
//! - **Serves results** - Finished files (and an optional zip archive) are
//!   exposed through download URLs on the bundled REST API
//!
//! ## Quick Start
//!
//! ```no_run
//! use playlist_dl::{BatchRequest, Config, PlaylistDownloader, SongInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = PlaylistDownloader::new(Config::from_env()?)?;
//!
//!     let batch = downloader
//!         .download_batch(BatchRequest {
//!             songs: vec![
//!                 SongInput::new("Song A", "Artist A"),
//!                 SongInput::new("Song B", "Artist B"),
//!             ],
//!             collection_name: Some("Road Trip".into()),
//!             create_archive: Some(true),
//!         })
//!         .await?;
//!
//!     println!("{}", batch.summary());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Zip archive creation
pub mod archive;
/// Configuration types
pub mod config;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Result materialization and file serving
pub mod materialize;
/// Playlist and track metadata providers
pub mod metadata;
/// Per-song pipeline and windowed batch orchestration
pub mod pipeline;
/// Source resolution and audio fetching
pub mod source;
/// External audio tool backends
pub mod tools;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;
/// Temporary workspaces and retention
pub mod workspace;

// Re-export commonly used types
pub use config::{Config, DownloadConfig, MetadataConfig, ToolsConfig};
pub use downloader::PlaylistDownloader;
pub use error::{ApiError, Error, ErrorDetail, MetadataError, Result, SongError, ToHttpStatus};
pub use metadata::{MetadataProvider, SpotifyClient};
pub use tools::{AudioToolBackend, UnavailableBackend, YtDlpBackend};
pub use types::{
    BatchJobState, BatchRequest, BatchStatus, Capabilities, DownloadHandle, ExtractedMetadata,
    ReferenceKind, SingleDownload, SongDescriptor, SongInput, SongJobState, SongStatus,
    SourceLocator,
};

/// Serve the REST API until a termination signal arrives.
///
/// Served files older than `download.retention_hours` are swept every
/// [`RETENTION_SWEEP_INTERVAL`](downloader::RETENTION_SWEEP_INTERVAL) while
/// the server runs. In-flight requests are drained before returning.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use playlist_dl::{Config, PlaylistDownloader, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Arc::new(Config::from_env()?);
///     let downloader = Arc::new(PlaylistDownloader::new((*config).clone())?);
///
///     // Run with automatic signal handling
///     run_with_shutdown(downloader, config).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(
    downloader: std::sync::Arc<PlaylistDownloader>,
    config: std::sync::Arc<Config>,
) -> Result<()> {
    serve_with_retention(downloader, config, wait_for_signal()).await
}

/// Serve the API with the retention sweep running alongside it.
/// The sweep is stopped whether the server exits cleanly or fails.
async fn serve_with_retention<F>(
    downloader: std::sync::Arc<PlaylistDownloader>,
    config: std::sync::Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let retention = downloader.start_retention_task(downloader::RETENTION_SWEEP_INTERVAL);
    let result = api::serve(downloader, config, shutdown).await;
    retention.abort();
    result
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(
                error = %e,
                "Could not register SIGTERM handler, waiting for SIGINT only"
            );
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(
                error = %e,
                "Could not register SIGINT handler, waiting for SIGTERM only"
            );
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
