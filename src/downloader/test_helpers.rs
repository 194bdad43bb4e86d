//! Shared test helpers: a scripted audio backend and downloader builders.

use crate::config::Config;
use crate::downloader::PlaylistDownloader;
use crate::error::{Result, SongError};
use crate::materialize::Materializer;
use crate::metadata::MetadataProvider;
use crate::pipeline::SongPipeline;
use crate::source::{AudioFetcher, SourceResolver};
use crate::tools::{AudioToolBackend, FetchRequest, SearchRecord};
use crate::types::{ExtractedMetadata, ReferenceKind, SongDescriptor};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Audio backend whose answers are scripted per query / source
///
/// Search ids are the lowercased query with spaces replaced by `-`, so the
/// song "Artist A - Song A" resolves to `artist-a-song-a`.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    no_results: Vec<String>,
    failing_fetch: Vec<String>,
    slow_fetch: Vec<(String, Duration)>,
    fetch_delay: Duration,
    skip_output: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    events: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queries containing `pattern` return no results
    pub(crate) fn without_results_for(mut self, pattern: &str) -> Self {
        self.no_results.push(pattern.to_string());
        self
    }

    /// Fetches of sources whose URL contains `pattern` exit non-zero
    pub(crate) fn failing_fetch_for(mut self, pattern: &str) -> Self {
        self.failing_fetch.push(pattern.to_string());
        self
    }

    /// Fetches of matching sources take `delay` instead of the default
    pub(crate) fn with_slow_fetch_for(mut self, pattern: &str, delay: Duration) -> Self {
        self.slow_fetch.push((pattern.to_string(), delay));
        self
    }

    pub(crate) fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Fetches succeed but write nothing
    pub(crate) fn without_output_files(mut self) -> Self {
        self.skip_output = true;
        self
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn searched_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl AudioToolBackend for ScriptedBackend {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchRecord>> {
        self.record(format!("search:{query}"));
        self.queries.lock().unwrap().push(query.to_string());

        if self.no_results.iter().any(|p| query.contains(p.as_str())) {
            return Ok(Vec::new());
        }

        let id = query.to_lowercase().replace(' ', "-");
        let record = SearchRecord {
            url: format!("https://www.youtube.com/watch?v={id}"),
            id,
            title: query.to_string(),
            duration: Some("3:30".into()),
            thumbnail: None,
        };
        Ok(std::iter::repeat_n(record, max_results.min(1)).collect())
    }

    async fn fetch_audio(&self, request: &FetchRequest<'_>) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .slow_fetch
            .iter()
            .find(|(p, _)| request.source_url.contains(p.as_str()))
            .map(|(_, d)| *d)
            .unwrap_or(self.fetch_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let id = request
            .source_url
            .rsplit("v=")
            .next()
            .unwrap_or(request.source_url)
            .to_string();

        let result = if self.failing_fetch.iter().any(|p| request.source_url.contains(p.as_str())) {
            Err(SongError::FetchFailed {
                reason: "ERROR: Video unavailable".into(),
            }
            .into())
        } else if self.skip_output {
            Ok(())
        } else {
            let path = request
                .output_dir
                .join(format!("{}.{}", request.filename_stem, request.audio_format));
            tokio::fs::write(&path, format!("fake audio for {id}"))
                .await
                .map_err(Into::into)
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.record(format!("fetched:{id}"));
        result
    }

    async fn version(&self) -> Result<String> {
        Ok("2024.08.06".into())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Metadata provider returning a fixed answer
pub(crate) struct StaticMetadata(pub(crate) Option<ExtractedMetadata>);

#[async_trait]
impl MetadataProvider for StaticMetadata {
    async fn extract(&self, reference: &str) -> Result<ExtractedMetadata> {
        self.0.clone().ok_or_else(|| {
            crate::error::MetadataError::InvalidFormat(reference.to_string()).into()
        })
    }

    fn is_configured(&self) -> bool {
        self.0.is_some()
    }
}

/// Songs `song-1..=n` named "Song i" by "Artist i"
pub(crate) fn numbered_songs(n: usize) -> Vec<SongDescriptor> {
    (1..=n)
        .map(|i| {
            SongDescriptor::new(format!("song-{i}"), format!("Song {i}"), format!("Artist {i}"))
        })
        .collect()
}

/// Playlist metadata for `numbered_songs(n)`
pub(crate) fn playlist_metadata(n: usize) -> ExtractedMetadata {
    ExtractedMetadata {
        kind: ReferenceKind::Playlist,
        songs: numbered_songs(n),
        collection_name: Some("Road Trip".into()),
    }
}

/// Pipeline over `backend` serving files from `output_dir`
pub(crate) fn pipeline_for(backend: Arc<dyn AudioToolBackend>, output_dir: &Path) -> SongPipeline {
    SongPipeline::new(
        SourceResolver::new(backend.clone()),
        AudioFetcher::new(backend, "mp3", "0"),
        Materializer::new("http://localhost:3000", output_dir),
    )
}

/// Config with every directory inside `root`
pub(crate) fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.download.temp_dir = root.join("temp");
    config.download.output_dir = root.join("downloads");
    config.download.max_concurrent_downloads = 3;
    config
}

/// Downloader over a scripted backend. The tempdir must be kept alive.
pub(crate) fn create_test_downloader(
    backend: ScriptedBackend,
) -> (PlaylistDownloader, Arc<ScriptedBackend>, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(backend);
    let downloader = PlaylistDownloader::with_components(
        test_config(temp_dir.path()),
        backend.clone(),
        Arc::new(StaticMetadata(Some(playlist_metadata(3)))),
    );
    (downloader, backend, temp_dir)
}
