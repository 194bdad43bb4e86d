//! Backend used when no audio tool is installed

use super::traits::{AudioToolBackend, FetchRequest, SearchRecord};
use crate::error::SongError;
use async_trait::async_trait;

const UNAVAILABLE: &str = "yt-dlp not installed or not accessible. \
     Configure tools.ytdlp_path or ensure yt-dlp is in PATH.";

/// Backend that refuses every operation
///
/// Lets the service start and answer metadata and capability requests even
/// when downloads are impossible.
///
/// ```
/// use playlist_dl::tools::{AudioToolBackend, UnavailableBackend};
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = UnavailableBackend;
/// assert!(backend.version().await.is_err());
/// # }
/// ```
pub struct UnavailableBackend;

#[async_trait]
impl AudioToolBackend for UnavailableBackend {
    async fn search(&self, _query: &str, _max_results: usize) -> crate::Result<Vec<SearchRecord>> {
        Err(SongError::ToolUnavailable(UNAVAILABLE.into()).into())
    }

    async fn fetch_audio(&self, _request: &FetchRequest<'_>) -> crate::Result<()> {
        Err(SongError::ToolUnavailable(UNAVAILABLE.into()).into())
    }

    async fn version(&self) -> crate::Result<String> {
        Err(SongError::ToolUnavailable(UNAVAILABLE.into()).into())
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::path::Path;

    #[tokio::test]
    async fn every_operation_reports_tool_unavailable() {
        let backend = UnavailableBackend;
        let request = FetchRequest {
            source_url: "https://example.com",
            output_dir: Path::new("/tmp"),
            filename_stem: "x",
            audio_format: "mp3",
            audio_quality: "0",
        };

        for err in [
            backend.search("q", 1).await.unwrap_err(),
            backend.fetch_audio(&request).await.unwrap_err(),
            backend.version().await.unwrap_err(),
        ] {
            assert!(matches!(err, Error::Song(SongError::ToolUnavailable(_))));
        }
        assert_eq!(backend.name(), "unavailable");
    }
}
