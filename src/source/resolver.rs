//! Source resolution via the audio tool's search mode

use crate::error::{Result, SongError};
use crate::tools::AudioToolBackend;
use crate::types::{SongDescriptor, SourceLocator};
use std::sync::Arc;
use tracing::debug;

/// Resolves a song to the first search hit
#[derive(Clone)]
pub struct SourceResolver {
    backend: Arc<dyn AudioToolBackend>,
}

impl SourceResolver {
    /// Create a resolver on top of `backend`
    pub fn new(backend: Arc<dyn AudioToolBackend>) -> Self {
        Self { backend }
    }

    /// Search for `"{artist} {title}"` and return the first result.
    ///
    /// No retries; a failure here ends only the owning song's pipeline.
    ///
    /// # Errors
    ///
    /// - `SongError::SourceNotFound` when the search returns nothing
    /// - `SongError::ToolUnavailable` when the tool is missing or broken
    pub async fn resolve(&self, descriptor: &SongDescriptor) -> Result<SourceLocator> {
        let query = descriptor.search_query();
        debug!(song_id = %descriptor.id, query = %query, "resolving audio source");

        let record = self
            .backend
            .search(&query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(SongError::SourceNotFound {
                query: query.clone(),
            })?;

        debug!(song_id = %descriptor.id, source = %record.url, "audio source found");

        Ok(SourceLocator {
            id: record.id,
            url: record.url,
            title: record.title,
            duration: record.duration,
            thumbnail: record.thumbnail,
        })
    }
}
