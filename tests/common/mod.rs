//! Common test utilities for playlist-dl integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use playlist_dl::config::Config;
use playlist_dl::tools::{AudioToolBackend, FetchRequest, SearchRecord};
use playlist_dl::{ExtractedMetadata, MetadataProvider, PlaylistDownloader, SongError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Fake audio tool: every query matches unless it contains one of
/// `unmatched`, and every fetch writes a small file.
#[derive(Default)]
pub struct FakeTool {
    pub unmatched: Vec<String>,
    pub searches: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl FakeTool {
    pub fn unmatched(patterns: &[&str]) -> Self {
        Self {
            unmatched: patterns.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl AudioToolBackend for FakeTool {
    async fn search(
        &self,
        query: &str,
        _max_results: usize,
    ) -> playlist_dl::Result<Vec<SearchRecord>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.unmatched.iter().any(|p| query.contains(p.as_str())) {
            return Ok(Vec::new());
        }
        let id = query.to_lowercase().replace(' ', "-");
        Ok(vec![SearchRecord {
            url: format!("https://www.youtube.com/watch?v={id}"),
            title: query.to_string(),
            id,
            duration: Some("3:30".to_string()),
            thumbnail: None,
        }])
    }

    async fn fetch_audio(&self, request: &FetchRequest<'_>) -> playlist_dl::Result<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        let path = request
            .output_dir
            .join(format!("{}.{}", request.filename_stem, request.audio_format));
        tokio::fs::write(&path, request.source_url.as_bytes()).await?;
        Ok(())
    }

    async fn version(&self) -> playlist_dl::Result<String> {
        Ok("fake-1.0".to_string())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Tool that is not installed
pub struct MissingTool;

#[async_trait]
impl AudioToolBackend for MissingTool {
    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> playlist_dl::Result<Vec<SearchRecord>> {
        Err(SongError::ToolUnavailable("not installed".into()).into())
    }

    async fn fetch_audio(&self, _request: &FetchRequest<'_>) -> playlist_dl::Result<()> {
        Err(SongError::ToolUnavailable("not installed".into()).into())
    }

    async fn version(&self) -> playlist_dl::Result<String> {
        Err(SongError::ToolUnavailable("not installed".into()).into())
    }

    fn name(&self) -> &'static str {
        "missing"
    }
}

/// Metadata provider that is never configured
pub struct NoMetadata;

#[async_trait]
impl MetadataProvider for NoMetadata {
    async fn extract(&self, reference: &str) -> playlist_dl::Result<ExtractedMetadata> {
        Err(playlist_dl::MetadataError::Unauthenticated(format!(
            "no credentials for {reference}"
        ))
        .into())
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Config rooted in a fresh temp directory with the given window size
pub fn test_config(window: usize) -> (Config, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.download.temp_dir = dir.path().join("temp");
    config.download.output_dir = dir.path().join("downloads");
    config.download.max_concurrent_downloads = window;
    (config, dir)
}

/// Downloader over `tool`; the temp dir must outlive it
pub fn downloader_with(
    tool: Arc<dyn AudioToolBackend>,
    window: usize,
) -> (PlaylistDownloader, Config, TempDir) {
    let (config, dir) = test_config(window);
    let downloader =
        PlaylistDownloader::with_components(config.clone(), tool, Arc::new(NoMetadata));
    (downloader, config, dir)
}

/// Number of entries directly inside `path` (0 if it does not exist)
pub fn entry_count(path: &std::path::Path) -> usize {
    std::fs::read_dir(path).map(|d| d.count()).unwrap_or(0)
}
