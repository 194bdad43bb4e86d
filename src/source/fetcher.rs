//! Audio download with on-disk verification

use crate::error::{Result, SongError};
use crate::tools::{AudioToolBackend, FetchRequest};
use crate::types::{ProgressMilestone, SourceLocator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Downloads located sources as audio files
///
/// A clean exit from the tool is not trusted on its own: after every fetch
/// the workspace is scanned for `{stem}.{audio_format}`.
#[derive(Clone)]
pub struct AudioFetcher {
    backend: Arc<dyn AudioToolBackend>,
    audio_format: String,
    audio_quality: String,
}

impl AudioFetcher {
    /// Create a fetcher producing `audio_format` at `audio_quality`
    pub fn new(
        backend: Arc<dyn AudioToolBackend>,
        audio_format: impl Into<String>,
        audio_quality: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            audio_format: audio_format.into(),
            audio_quality: audio_quality.into(),
        }
    }

    /// Target codec / file extension
    pub fn audio_format(&self) -> &str {
        &self.audio_format
    }

    /// Fetch `locator` into `workspace_dir` as `{filename_stem}.{ext}`.
    ///
    /// `on_progress` receives [`ProgressMilestone::Fetched`] once the file is
    /// verified. Returns the exact path of the produced file.
    ///
    /// # Errors
    ///
    /// - `SongError::ToolUnavailable` / `SongError::FetchFailed` from the tool
    /// - `SongError::FileNotProduced` if no matching file exists afterwards
    pub async fn fetch<F>(
        &self,
        locator: &SourceLocator,
        workspace_dir: &Path,
        filename_stem: &str,
        mut on_progress: F,
    ) -> Result<PathBuf>
    where
        F: FnMut(ProgressMilestone) + Send,
    {
        let request = FetchRequest {
            source_url: &locator.url,
            output_dir: workspace_dir,
            filename_stem,
            audio_format: &self.audio_format,
            audio_quality: &self.audio_quality,
        };

        debug!(
            source = %locator.url,
            stem = filename_stem,
            backend = self.backend.name(),
            "fetching audio"
        );
        self.backend.fetch_audio(&request).await?;

        let path = self.find_output(workspace_dir, filename_stem).await?;
        on_progress(ProgressMilestone::Fetched);
        Ok(path)
    }

    async fn find_output(&self, dir: &Path, stem: &str) -> Result<PathBuf> {
        let not_produced = || SongError::FileNotProduced {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
        };

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot scan workspace for fetched file");
                return Err(not_produced().into());
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let matches_stem = path.file_stem().and_then(|s| s.to_str()) == Some(stem);
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(&self.audio_format));

            if matches_stem && matches_ext && entry.file_type().await.is_ok_and(|t| t.is_file()) {
                return Ok(path);
            }
        }

        Err(not_produced().into())
    }
}
