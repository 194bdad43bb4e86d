//! Spotify Web API client

use super::MetadataProvider;
use crate::config::MetadataConfig;
use crate::error::{Error, MetadataError, Result};
use crate::types::{ExtractedMetadata, ReferenceKind, SongDescriptor};
use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Accepted reference URLs: `https://open.spotify.com/{track|playlist}/{id}[?...]`
const REFERENCE_PATTERN: &str =
    r"^https://open\.spotify\.com/(playlist|track)/([a-zA-Z0-9]+)(\?.*)?$";

/// Items requested per playlist page
const PAGE_SIZE: usize = 50;

/// Refresh tokens this long before Spotify says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    id: Option<String>,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
struct PlaylistObject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next: Option<String>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl TrackObject {
    fn into_descriptor(self) -> Option<SongDescriptor> {
        let id = self.id?;
        let artists = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Some(SongDescriptor::new(id, self.name, artists))
    }
}

/// Client-credentials Spotify metadata client
///
/// Tokens are cached until shortly before they expire.
///
/// ```no_run
/// use playlist_dl::config::MetadataConfig;
/// use playlist_dl::metadata::{MetadataProvider, SpotifyClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SpotifyClient::new(MetadataConfig {
///     client_id: Some("id".into()),
///     client_secret: Some("secret".into()),
///     ..Default::default()
/// })?;
///
/// let meta = client
///     .extract("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M")
///     .await?;
/// println!("{} songs", meta.songs.len());
/// # Ok(())
/// # }
/// ```
pub struct SpotifyClient {
    http: reqwest::Client,
    config: MetadataConfig,
    reference_pattern: Regex,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    /// Create a client from metadata configuration
    pub fn new(config: MetadataConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("playlist-dl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let reference_pattern = Regex::new(REFERENCE_PATTERN).map_err(|e| Error::Config {
            message: format!("invalid reference pattern: {e}"),
            key: None,
        })?;

        Ok(Self {
            http,
            config,
            reference_pattern,
            token: Mutex::new(None),
        })
    }

    /// Split a reference URL into its kind and id.
    ///
    /// # Errors
    ///
    /// `MetadataError::InvalidFormat` for anything that is not a public
    /// track or playlist URL.
    pub fn parse_reference(&self, reference: &str) -> Result<(ReferenceKind, String)> {
        let invalid = || MetadataError::InvalidFormat(reference.to_string());

        let captures = self
            .reference_pattern
            .captures(reference.trim())
            .ok_or_else(invalid)?;
        let kind = match captures.get(1).map(|m| m.as_str()) {
            Some("track") => ReferenceKind::Track,
            Some("playlist") => ReferenceKind::Playlist,
            _ => return Err(invalid().into()),
        };
        let id = captures.get(2).ok_or_else(invalid)?.as_str().to_string();
        Ok((kind, id))
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.value.clone());
        }

        let (Some(client_id), Some(client_secret)) =
            (&self.config.client_id, &self.config.client_secret)
        else {
            return Err(MetadataError::Unauthenticated(
                "Spotify credentials not configured".into(),
            )
            .into());
        };

        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Spotify token request rejected");
            return Err(MetadataError::Unauthenticated(format!(
                "token request failed with status {}",
                response.status()
            ))
            .into());
        }

        let body: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: body.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        debug!(expires_in = body.expires_in, "obtained Spotify access token");
        Ok(body.access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: &str, what: &str) -> Result<T> {
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        Err(status_error(status, what, retry_after).into())
    }

    async fn fetch_track(&self, id: &str, token: &str) -> Result<ExtractedMetadata> {
        let url = format!("{}/tracks/{}", self.config.api_base, id);
        let track: TrackObject = self.get_json(&url, token, "Track").await?;

        let song = track.into_descriptor().ok_or_else(|| {
            MetadataError::NotFound("Track not found or not accessible".into())
        })?;

        Ok(ExtractedMetadata {
            kind: ReferenceKind::Track,
            songs: vec![song],
            collection_name: None,
        })
    }

    async fn fetch_playlist(&self, id: &str, token: &str) -> Result<ExtractedMetadata> {
        let url = format!("{}/playlists/{}", self.config.api_base, id);
        let playlist: PlaylistObject = self.get_json(&url, token, "Playlist").await?;

        let mut songs = Vec::new();
        let mut skipped = 0usize;
        let mut next = Some(format!(
            "{}/playlists/{}/tracks?limit={}",
            self.config.api_base, id, PAGE_SIZE
        ));

        while let Some(page_url) = next {
            let page: PlaylistPage = self.get_json(&page_url, token, "Playlist").await?;
            for item in page.items {
                match item.track.and_then(TrackObject::into_descriptor) {
                    Some(song) => songs.push(song),
                    None => skipped += 1,
                }
            }
            next = page.next;
        }

        if skipped > 0 {
            debug!(playlist = %playlist.name, skipped, "skipped unavailable playlist entries");
        }

        Ok(ExtractedMetadata {
            kind: ReferenceKind::Playlist,
            songs,
            collection_name: Some(playlist.name),
        })
    }
}

fn status_error(status: StatusCode, what: &str, retry_after: Option<u64>) -> MetadataError {
    match status {
        StatusCode::NOT_FOUND => {
            MetadataError::NotFound(format!("{what} not found or not accessible"))
        }
        StatusCode::BAD_REQUEST => {
            MetadataError::InvalidFormat(format!("{what} id rejected by Spotify"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            MetadataError::Unauthenticated(format!("Spotify refused access ({status})"))
        }
        StatusCode::TOO_MANY_REQUESTS => MetadataError::RateLimited { retry_after },
        other => MetadataError::Upstream(format!(
            "failed to fetch {} ({other})",
            what.to_lowercase()
        )),
    }
}

#[async_trait]
impl MetadataProvider for SpotifyClient {
    async fn extract(&self, reference: &str) -> Result<ExtractedMetadata> {
        let (kind, id) = self.parse_reference(reference)?;
        let token = self.access_token().await?;

        let metadata = match kind {
            ReferenceKind::Track => self.fetch_track(&id, &token).await?,
            ReferenceKind::Playlist => self.fetch_playlist(&id, &token).await?,
        };

        if metadata.songs.is_empty() {
            return Err(MetadataError::NotFound("no playable tracks found".into()).into());
        }

        info!(kind = ?metadata.kind, songs = metadata.songs.len(), "extracted metadata");
        Ok(metadata)
    }

    fn is_configured(&self) -> bool {
        self.config.client_id.as_deref().is_some_and(|s| !s.is_empty())
            && self.config.client_secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}
