//! Source search and single-song downloads.

use crate::error::{Error, Result};
use crate::types::{SingleDownload, SongDescriptor, SongInput, SongJobState, SourceLocator};
use crate::utils::format_file_size;
use crate::workspace::Workspace;

use super::PlaylistDownloader;

impl PlaylistDownloader {
    fn descriptor_for(song: &SongInput) -> Result<SongDescriptor> {
        song.to_descriptor(0)
            .ok_or_else(|| Error::Validation("song title and artist are required".into()))
    }

    /// Find the audio source a download of `song` would use
    ///
    /// # Errors
    ///
    /// `Error::Validation` for a blank song, `SongError::ToolUnavailable` when
    /// the tool cannot run, `SongError::SourceNotFound` when nothing matches.
    pub async fn search(&self, song: &SongInput) -> Result<(SongDescriptor, SourceLocator)> {
        let descriptor = Self::descriptor_for(song)?;
        self.ensure_tool_available().await?;

        let source = crate::source::SourceResolver::new(self.backend.clone())
            .resolve(&descriptor)
            .await?;
        Ok((descriptor, source))
    }

    /// Download one song outside of any batch
    ///
    /// Runs the same stages as a batch song in its own workspace, but errors
    /// are returned instead of being folded into a job state.
    pub async fn download_single(&self, song: &SongInput) -> Result<SingleDownload> {
        let descriptor = Self::descriptor_for(song)?;
        self.ensure_tool_available().await?;

        let workspace = Workspace::create(&self.config.download.temp_dir, "single-download").await?;
        let mut state = SongJobState::pending(&descriptor);

        let result = self
            .pipeline
            .execute(&descriptor, 0, workspace.path(), &mut state)
            .await;
        workspace.cleanup().await;

        let done = result?;
        tracing::info!(
            song_id = %descriptor.id,
            file = %done.handle.filename,
            size = %format_file_size(done.handle.size),
            "single download finished"
        );

        Ok(SingleDownload {
            song: descriptor,
            source: done.source,
            download_url: done.handle.url,
            filename: done.handle.filename,
            size: done.handle.size,
            mime_type: done.handle.mime_type,
        })
    }
}
