//! Batch downloads: validation, windowed execution, archive packaging.

use crate::archive::{ArchiveBuilder, ArchiveEntry};
use crate::error::{Error, Result};
use crate::pipeline::BatchOrchestrator;
use crate::types::{BatchJobState, BatchRequest, DownloadHandle, SongDescriptor, SongStatus};
use crate::utils::{format_file_size, sanitize_filename};
use crate::workspace::Workspace;
use std::path::Path;

use super::PlaylistDownloader;

/// Collection name used when the caller gives none
pub const DEFAULT_COLLECTION_NAME: &str = "Unknown Playlist";

impl PlaylistDownloader {
    /// Download every song of `request`.
    ///
    /// Requests with no usable songs are rejected before any workspace or
    /// process is created, as is a batch for which the audio tool is not
    /// available. After that, per-song failures are reported in the returned
    /// state and never fail the call. An archive failure leaves
    /// `archive_url` empty and fills `archive_error`.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` for an empty list or one without valid entries
    /// - `SongError::ToolUnavailable` when the tool probe fails
    /// - `Error::Workspace` when the batch workspace cannot be created
    pub async fn download_batch(&self, request: BatchRequest) -> Result<BatchJobState> {
        if request.songs.is_empty() {
            return Err(Error::Validation(
                "songs array is required and must contain at least one song".into(),
            ));
        }

        let descriptors: Vec<SongDescriptor> = request
            .songs
            .iter()
            .enumerate()
            .filter_map(|(position, song)| {
                let descriptor = song.to_descriptor(position);
                if descriptor.is_none() {
                    tracing::warn!(position, "dropping song without title or artist");
                }
                descriptor
            })
            .collect();

        if descriptors.is_empty() {
            return Err(Error::Validation(
                "no valid songs found in the provided array".into(),
            ));
        }

        self.ensure_tool_available().await?;

        let collection_name = request
            .collection_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string());
        let create_archive = request
            .create_archive
            .unwrap_or(self.config.download.create_archive);

        let workspace =
            Workspace::create(&self.config.download.temp_dir, "playlist-download").await?;
        tracing::info!(
            collection = %collection_name,
            songs = descriptors.len(),
            workspace = %workspace.path().display(),
            "starting batch"
        );

        let orchestrator = BatchOrchestrator::new(
            self.pipeline.clone(),
            self.config.download.max_concurrent_downloads,
        );
        let mut batch = orchestrator
            .run(collection_name, &descriptors, workspace.path())
            .await;

        if create_archive && batch.completed_songs > 0 {
            match self
                .build_archive(&batch, &descriptors, workspace.path())
                .await
            {
                Ok(handle) => {
                    batch.archive_url = Some(handle.url.clone());
                    batch.archive = Some(handle);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "archive step failed, song results still reported");
                    batch.archive_error = Some(e.to_string());
                }
            }
        }

        workspace.cleanup().await;
        Ok(batch)
    }

    async fn build_archive(
        &self,
        batch: &BatchJobState,
        descriptors: &[SongDescriptor],
        workspace_dir: &Path,
    ) -> Result<DownloadHandle> {
        let materializer = self.pipeline.materializer();

        let entries: Vec<ArchiveEntry> = batch
            .songs
            .iter()
            .zip(descriptors)
            .enumerate()
            .filter(|(_, (state, _))| state.status == SongStatus::Completed)
            .filter_map(|(i, (state, descriptor))| {
                let handle = state.download.as_ref()?;
                let extension = Path::new(&handle.filename)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or(&self.config.download.audio_format);
                Some(ArchiveEntry {
                    source_path: materializer.output_dir().join(&handle.filename),
                    entry_name: format!(
                        "{:02} - {}.{}",
                        i + 1,
                        sanitize_filename(&descriptor.filename_slug),
                        extension
                    ),
                })
            })
            .collect();

        let staging =
            workspace_dir.join(format!("{}.zip", sanitize_filename(&batch.collection_name)));
        ArchiveBuilder::build(&entries, &staging).await?;

        let promoted = materializer.promote(&staging, &batch.collection_name).await?;
        let mut handle = materializer.materialize(&promoted)?;
        handle.size = tokio::fs::metadata(&promoted).await?.len();

        tracing::info!(
            file = %handle.filename,
            size = %format_file_size(handle.size),
            "archive ready"
        );
        Ok(handle)
    }
}
