//! Configuration types for playlist-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Download behavior configuration (directories, window size, output format)
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Root under which per-request workspaces are created
    /// (default: `<system temp>/playlist-dl`)
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Directory finished files are promoted into and served from (default: "./downloads")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Number of songs processed concurrently per window (default: 3)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Bundle successful batch downloads into a zip archive (default: true)
    #[serde(default = "default_true")]
    pub create_archive: bool,

    /// Target codec passed to the audio tool (default: "mp3")
    #[serde(default = "default_audio_format")]
    pub audio_format: String,

    /// Audio quality passed to the audio tool, "0" is best (default: "0")
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,

    /// Served files older than this are deleted by the retention sweep (default: 24)
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            output_dir: default_output_dir(),
            max_concurrent_downloads: default_max_concurrent(),
            create_archive: true,
            audio_format: default_audio_format(),
            audio_quality: default_audio_quality(),
            retention_hours: default_retention_hours(),
        }
    }
}

/// External tool configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Kill a tool invocation that runs longer than this (None = no limit)
    #[serde(default, with = "optional_duration_serde")]
    #[schema(value_type = Option<u64>)]
    pub process_timeout: Option<Duration>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
            process_timeout: None,
        }
    }
}

/// Metadata service (Spotify Web API) configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MetadataConfig {
    /// OAuth client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// API base URL (default: "https://api.spotify.com/v1")
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Token endpoint (default: "https://accounts.spotify.com/api/token")
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base: default_api_base(),
            token_url: default_token_url(),
        }
    }
}

/// API and external server integration configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Externally reachable base URL used when building download links
    /// (default: "http://localhost:3000")
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            public_base_url: default_public_base_url(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for PlaylistDownloader
///
/// Fields are organized into sub-configs:
/// - [`download`](DownloadConfig) - directories, window size, output format
/// - [`tools`](ToolsConfig) - external binary discovery and timeouts
/// - [`metadata`](MetadataConfig) - metadata service credentials
/// - [`server`](ServerIntegrationConfig) - REST API
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download behavior settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// External tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Metadata service settings
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// API server settings
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Build a configuration from defaults overlaid with environment variables.
    ///
    /// Recognised variables: `MAX_CONCURRENT_DOWNLOADS`, `PUBLIC_BASE_URL`,
    /// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `YT_DLP_PATH`,
    /// `PLAYLIST_DL_TEMP_DIR`, `PLAYLIST_DL_OUTPUT_DIR`, `PLAYLIST_DL_BIND`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("MAX_CONCURRENT_DOWNLOADS") {
            self.download.max_concurrent_downloads =
                value.trim().parse().map_err(|_| Error::Config {
                    message: format!("MAX_CONCURRENT_DOWNLOADS is not a number: {value}"),
                    key: Some("max_concurrent_downloads".into()),
                })?;
        }
        if let Some(value) = lookup("PUBLIC_BASE_URL") {
            self.server.api.public_base_url = value;
        }
        if let Some(value) = lookup("SPOTIFY_CLIENT_ID") {
            self.metadata.client_id = Some(value);
        }
        if let Some(value) = lookup("SPOTIFY_CLIENT_SECRET") {
            self.metadata.client_secret = Some(value);
        }
        if let Some(value) = lookup("YT_DLP_PATH") {
            self.tools.ytdlp_path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("PLAYLIST_DL_TEMP_DIR") {
            self.download.temp_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("PLAYLIST_DL_OUTPUT_DIR") {
            self.download.output_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("PLAYLIST_DL_BIND") {
            self.server.api.bind_address = value.parse().map_err(|_| Error::Config {
                message: format!("PLAYLIST_DL_BIND is not a socket address: {value}"),
                key: Some("bind_address".into()),
            })?;
        }
        Ok(())
    }

    /// Reject settings the downloader cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.download.max_concurrent_downloads == 0 {
            return Err(Error::Config {
                message: "max_concurrent_downloads must be at least 1".into(),
                key: Some("max_concurrent_downloads".into()),
            });
        }
        if !crate::materialize::is_servable(&self.download.audio_format) {
            return Err(Error::Config {
                message: format!(
                    "audio_format {} cannot be served",
                    self.download.audio_format
                ),
                key: Some("audio_format".into()),
            });
        }
        if url::Url::parse(&self.server.api.public_base_url).is_err() {
            return Err(Error::Config {
                message: format!(
                    "public_base_url is not a valid URL: {}",
                    self.server.api.public_base_url
                ),
                key: Some("public_base_url".into()),
            });
        }
        Ok(())
    }
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("playlist-dl")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_max_concurrent() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_audio_format() -> String {
    "mp3".into()
}

fn default_audio_quality() -> String {
    "0".into()
}

fn default_retention_hours() -> u64 {
    24
}

fn default_api_base() -> String {
    "https://api.spotify.com/v1".into()
}

fn default_token_url() -> String {
    "https://accounts.spotify.com/api/token".into()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_public_base_url() -> String {
    "http://localhost:3000".into()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
