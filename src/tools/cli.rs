//! yt-dlp backend driving the external binary

use super::parser::{parse_search_output, stderr_summary};
use super::traits::{AudioToolBackend, FetchRequest, SearchRecord};
use crate::config::ToolsConfig;
use crate::error::SongError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Why an invocation produced no output at all
enum RunFailure {
    Spawn(std::io::Error),
    TimedOut(Duration),
}

/// Audio backend that shells out to `yt-dlp`
///
/// Searches use `ytsearchN:` queries with `--dump-json`, downloads extract
/// audio into the requested directory under `{stem}.{ext}`.
///
/// # Examples
///
/// ```no_run
/// use playlist_dl::tools::{AudioToolBackend, YtDlpBackend};
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Explicit path
/// let backend = YtDlpBackend::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let backend = YtDlpBackend::from_path().expect("yt-dlp not found in PATH");
///
/// println!("yt-dlp {}", backend.version().await?);
/// # Ok(())
/// # }
/// ```
pub struct YtDlpBackend {
    binary_path: PathBuf,
    timeout: Option<Duration>,
}

impl YtDlpBackend {
    /// Create a backend with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            timeout: None,
        }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Build from tool configuration: the explicit path wins, then PATH
    /// discovery when enabled.
    pub fn from_config(config: &ToolsConfig) -> Option<Self> {
        let backend = match &config.ytdlp_path {
            Some(path) => Some(Self::new(path.clone())),
            None if config.search_path => Self::from_path(),
            None => None,
        };
        backend.map(|b| b.with_timeout(config.process_timeout))
    }

    /// Kill invocations that exceed `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, args: &[&str]) -> Result<Output, RunFailure> {
        let child = Command::new(&self.binary_path)
            .args(args)
            .kill_on_drop(true)
            .output();

        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child).await {
                Ok(result) => result.map_err(RunFailure::Spawn),
                Err(_) => Err(RunFailure::TimedOut(limit)),
            },
            None => child.await.map_err(RunFailure::Spawn),
        }
    }
}

fn search_args(query: &str, max_results: usize) -> Vec<String> {
    let n = max_results.max(1);
    vec![
        "--quiet".into(),
        "--no-warnings".into(),
        "--dump-json".into(),
        "--playlist-end".into(),
        n.to_string(),
        format!("ytsearch{n}:{query}"),
    ]
}

fn fetch_args(request: &FetchRequest<'_>) -> Vec<String> {
    let template = request
        .output_dir
        .join(format!("{}.%(ext)s", request.filename_stem));
    vec![
        "--extract-audio".into(),
        "--audio-format".into(),
        request.audio_format.into(),
        "--audio-quality".into(),
        request.audio_quality.into(),
        "--output".into(),
        template.to_string_lossy().into_owned(),
        "--no-playlist".into(),
        "--quiet".into(),
        "--no-warnings".into(),
        request.source_url.into(),
    ]
}

#[async_trait]
impl AudioToolBackend for YtDlpBackend {
    async fn search(&self, query: &str, max_results: usize) -> crate::Result<Vec<SearchRecord>> {
        let args = search_args(query, max_results);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = self.run(&args).await.map_err(|failure| match failure {
            RunFailure::Spawn(e) => {
                SongError::ToolUnavailable(format!("failed to execute yt-dlp: {e}"))
            }
            RunFailure::TimedOut(limit) => SongError::ToolUnavailable(format!(
                "yt-dlp search timed out after {}s",
                limit.as_secs()
            )),
        })?;

        if !output.status.success() {
            return Err(SongError::ToolUnavailable(format!(
                "yt-dlp search failed: {}",
                stderr_summary(&output.stderr)
            ))
            .into());
        }

        parse_search_output(&output.stdout)
    }

    async fn fetch_audio(&self, request: &FetchRequest<'_>) -> crate::Result<()> {
        let args = fetch_args(request);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = self.run(&args).await.map_err(|failure| match failure {
            RunFailure::Spawn(e) => {
                SongError::ToolUnavailable(format!("failed to execute yt-dlp: {e}"))
            }
            RunFailure::TimedOut(limit) => SongError::FetchFailed {
                reason: format!("timed out after {}s", limit.as_secs()),
            },
        })?;

        if !output.status.success() {
            return Err(SongError::FetchFailed {
                reason: stderr_summary(&output.stderr),
            }
            .into());
        }
        Ok(())
    }

    async fn version(&self) -> crate::Result<String> {
        let output = self.run(&["--version"]).await.map_err(|failure| match failure {
            RunFailure::Spawn(e) => {
                SongError::ToolUnavailable(format!("failed to execute yt-dlp: {e}"))
            }
            RunFailure::TimedOut(_) => {
                SongError::ToolUnavailable("yt-dlp --version timed out".into())
            }
        })?;

        if !output.status.success() {
            return Err(SongError::ToolUnavailable(stderr_summary(&output.stderr)).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
