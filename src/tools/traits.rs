//! Traits and types for the external audio search/fetch tool

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// One search hit as reported by the tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchRecord {
    /// Source-side identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Page URL the fetcher can download from
    #[serde(rename = "webpage_url")]
    pub url: String,
    /// Duration as a display string (e.g. "3:45")
    #[serde(default, rename = "duration_string")]
    pub duration: Option<String>,
    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Parameters for a single audio fetch
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// URL of the source to download
    pub source_url: &'a str,
    /// Directory the file must be written into
    pub output_dir: &'a Path,
    /// Filename stem; the tool picks the extension
    pub filename_stem: &'a str,
    /// Target codec (e.g. "mp3")
    pub audio_format: &'a str,
    /// Target quality ("0" is best)
    pub audio_quality: &'a str,
}

/// Capability abstraction over the external search/fetch tool
///
/// Implementations spawn external processes, call a library, or (in tests)
/// script their answers. All failures surface as [`crate::Error::Song`].
///
/// # Examples
///
/// ```no_run
/// use playlist_dl::tools::{AudioToolBackend, YtDlpBackend};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = YtDlpBackend::from_path().expect("yt-dlp not found in PATH");
///
/// let hits = backend.search("Artist A Song A", 1).await?;
/// if let Some(hit) = hits.first() {
///     println!("{} -> {}", hit.title, hit.url);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait AudioToolBackend: Send + Sync {
    /// Search for `query`, returning at most `max_results` records in the
    /// tool's relevance order. An empty vector means "no results".
    ///
    /// # Errors
    ///
    /// `SongError::ToolUnavailable` if the tool is missing, exits non-zero or
    /// emits output that cannot be parsed.
    async fn search(&self, query: &str, max_results: usize) -> crate::Result<Vec<SearchRecord>>;

    /// Download audio for one source into `request.output_dir`.
    ///
    /// A successful return only means the tool exited cleanly; callers must
    /// verify the file themselves.
    ///
    /// # Errors
    ///
    /// `SongError::ToolUnavailable` if the tool cannot be started,
    /// `SongError::FetchFailed` if it exits non-zero or times out.
    async fn fetch_audio(&self, request: &FetchRequest<'_>) -> crate::Result<()>;

    /// Report the tool version; used as an availability probe.
    async fn version(&self) -> crate::Result<String>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
