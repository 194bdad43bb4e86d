//! Lifecycle of a single song: search, fetch, promote, materialize

use crate::error::Result;
use crate::materialize::Materializer;
use crate::source::{AudioFetcher, SourceResolver};
use crate::types::{
    DownloadHandle, ProgressMilestone, SongDescriptor, SongJobState, SongStatus, SourceLocator,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of a song that made it all the way through
#[derive(Clone, Debug)]
pub struct CompletedSong {
    /// Source the audio came from
    pub source: SourceLocator,
    /// Handle for the promoted file
    pub handle: DownloadHandle,
    /// Where the promoted file lives
    pub path: PathBuf,
}

/// Composes resolver, fetcher and materializer for one song
#[derive(Clone)]
pub struct SongPipeline {
    resolver: SourceResolver,
    fetcher: AudioFetcher,
    materializer: Materializer,
}

impl SongPipeline {
    /// Create a pipeline from its stages
    pub fn new(
        resolver: SourceResolver,
        fetcher: AudioFetcher,
        materializer: Materializer,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            materializer,
        }
    }

    /// Serving-side stages
    pub fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// Drive `state` to a terminal status. Never fails: errors end up in
    /// `state.error`.
    pub async fn run(
        &self,
        descriptor: &SongDescriptor,
        index: usize,
        workspace_dir: &Path,
        state: &mut SongJobState,
    ) {
        match self.execute(descriptor, index, workspace_dir, state).await {
            Ok(done) => {
                info!(
                    song_index = index,
                    song_id = %descriptor.id,
                    file = %done.handle.filename,
                    "song downloaded"
                );
                state.complete(done.handle);
            }
            Err(e) => {
                warn!(song_index = index, song_id = %descriptor.id, error = %e, "song failed");
                state.fail(e.to_string());
            }
        }
    }

    /// Same stages as [`run`](Self::run) but errors are returned to the
    /// caller. `state` still receives status and progress updates; it is not
    /// moved to a terminal status.
    pub async fn execute(
        &self,
        descriptor: &SongDescriptor,
        index: usize,
        workspace_dir: &Path,
        state: &mut SongJobState,
    ) -> Result<CompletedSong> {
        state.transition(SongStatus::Searching);
        state.advance(ProgressMilestone::SearchStarted.percent());
        let source = self.resolver.resolve(descriptor).await?;

        state.transition(SongStatus::Downloading);
        state.advance(ProgressMilestone::SourceFound.percent());

        let stem = format!(
            "{:03}_{}",
            index + 1,
            crate::utils::sanitize_filename(&descriptor.filename_slug)
        );
        let fetched = self
            .fetcher
            .fetch(&source, workspace_dir, &stem, |milestone| {
                state.advance(milestone.percent())
            })
            .await?;
        debug!(song_index = index, path = %fetched.display(), "fetched audio");

        // Nothing reaches the serving directory unless it can be served
        self.materializer.ensure_servable(&fetched)?;
        let path = self
            .materializer
            .promote(&fetched, &descriptor.filename_slug)
            .await?;
        let mut handle = self.materializer.materialize(&path)?;
        handle.size = tokio::fs::metadata(&path).await?.len();

        Ok(CompletedSong {
            source,
            handle,
            path,
        })
    }
}
