//! Core types for playlist-dl

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized song identity produced by the metadata collaborator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SongDescriptor {
    /// Stable identifier
    pub id: String,
    /// Track title
    pub title: String,
    /// Artist name(s), comma separated
    pub artist: String,
    /// Pre-sanitized name usable as a filename stem
    pub filename_slug: String,
}

impl SongDescriptor {
    /// Create a descriptor, deriving the filename slug from artist and title
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        let title = title.into();
        let artist = artist.into();
        let filename_slug = crate::utils::song_slug(&artist, &title);
        Self {
            id: id.into(),
            title,
            artist,
            filename_slug,
        }
    }

    /// Search query used to locate an audio source: `"{artist} {title}"`
    pub fn search_query(&self) -> String {
        format!("{} {}", self.artist, self.title)
    }
}

/// Reference to the audio source chosen for a descriptor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceLocator {
    /// Source-side identifier
    pub id: String,
    /// URL handed to the fetcher
    pub url: String,
    /// Display title of the source
    pub title: String,
    /// Duration hint as reported by the tool (e.g. "3:45")
    pub duration: Option<String>,
    /// Thumbnail URL, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Per-song lifecycle status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SongStatus {
    /// Created, not started
    #[default]
    Pending,
    /// Looking up an audio source
    Searching,
    /// Fetching audio from the located source
    Downloading,
    /// Audio file available
    Completed,
    /// Failed; see `error`
    Error,
}

impl SongStatus {
    /// Whether no further transitions can occur
    pub fn is_terminal(self) -> bool {
        matches!(self, SongStatus::Completed | SongStatus::Error)
    }
}

/// Coarse progress milestones reported by the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressMilestone {
    /// Search started (10%)
    SearchStarted,
    /// Source located (30%)
    SourceFound,
    /// Audio file written (100%)
    Fetched,
}

impl ProgressMilestone {
    /// Percentage for this milestone
    pub fn percent(self) -> u8 {
        match self {
            ProgressMilestone::SearchStarted => 10,
            ProgressMilestone::SourceFound => 30,
            ProgressMilestone::Fetched => 100,
        }
    }
}

/// Externally addressable handle for a finished file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadHandle {
    /// Served filename
    pub filename: String,
    /// URL the file can be fetched from
    pub url: String,
    /// MIME type derived from the extension
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
}

/// Mutable state of one song within a batch
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SongJobState {
    /// Descriptor id
    pub id: String,
    /// Track title
    pub title: String,
    /// Artist name(s)
    pub artist: String,
    /// Lifecycle status
    pub status: SongStatus,
    /// Coarse progress percentage, never decreases
    pub progress: u8,
    /// Failure message when `status == error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Download URL when `status == completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Full handle when `status == completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadHandle>,
}

impl SongJobState {
    /// Fresh `pending` state for a descriptor
    pub fn pending(descriptor: &SongDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            title: descriptor.title.clone(),
            artist: descriptor.artist.clone(),
            status: SongStatus::Pending,
            progress: 0,
            error: None,
            download_url: None,
            download: None,
        }
    }

    /// Raise progress to `percent`; lower values are ignored.
    pub fn advance(&mut self, percent: u8) {
        if self.status.is_terminal() {
            return;
        }
        self.progress = self.progress.max(percent.min(100));
    }

    /// Move to a non-terminal status. Ignored once terminal.
    pub fn transition(&mut self, status: SongStatus) {
        if self.status.is_terminal() {
            tracing::debug!(
                song_id = %self.id,
                ?status,
                "ignoring transition out of terminal state"
            );
            return;
        }
        self.status = status;
    }

    /// Terminal success
    pub fn complete(&mut self, handle: DownloadHandle) {
        if self.status.is_terminal() {
            return;
        }
        self.status = SongStatus::Completed;
        self.progress = 100;
        self.download_url = Some(handle.url.clone());
        self.download = Some(handle);
    }

    /// Terminal failure
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        let message = message.into();
        self.status = SongStatus::Error;
        self.error = Some(if message.is_empty() {
            "Unknown error".to_string()
        } else {
            message
        });
    }
}

/// Overall batch status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Windows still running
    #[default]
    Processing,
    /// All windows drained (individual songs may have failed)
    Completed,
    /// Whole-batch fault
    Error,
}

/// Aggregate state of a batch
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchJobState {
    /// Playlist or album name
    pub collection_name: String,
    /// Number of songs in the batch
    pub total_songs: usize,
    /// Songs that reached `completed`
    pub completed_songs: usize,
    /// Songs that reached `error`
    pub failed_songs: usize,
    /// Per-song state in input order
    pub songs: Vec<SongJobState>,
    /// Overall status
    pub overall_status: BatchStatus,
    /// Archive download URL, if an archive was built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,
    /// Full archive handle, if an archive was built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<DownloadHandle>,
    /// Why the archive step failed, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_error: Option<String>,
}

impl BatchJobState {
    /// New `processing` batch with every song `pending`
    pub fn new(collection_name: impl Into<String>, descriptors: &[SongDescriptor]) -> Self {
        Self {
            collection_name: collection_name.into(),
            total_songs: descriptors.len(),
            completed_songs: 0,
            failed_songs: 0,
            songs: descriptors.iter().map(SongJobState::pending).collect(),
            overall_status: BatchStatus::Processing,
            archive_url: None,
            archive: None,
            archive_error: None,
        }
    }

    /// Human-readable one-line summary of the outcome
    pub fn summary(&self) -> String {
        let mut message = format!("{} songs downloaded successfully", self.completed_songs);
        if self.failed_songs > 0 {
            message.push_str(&format!(", {} failed", self.failed_songs));
        }
        message.push('.');
        message
    }
}

/// Kind of reference the metadata collaborator resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// A single track
    Track,
    /// A playlist
    Playlist,
}

/// Output of the metadata collaborator
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ExtractedMetadata {
    /// Track or playlist
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    /// Songs in source order
    pub songs: Vec<SongDescriptor>,
    /// Playlist name (None for a single track)
    pub collection_name: Option<String>,
}

/// Result of a single-song download
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SingleDownload {
    /// Song that was downloaded
    pub song: SongDescriptor,
    /// Source the audio came from
    pub source: SourceLocator,
    /// URL to fetch the file from
    pub download_url: String,
    /// Served filename
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type
    pub mime_type: String,
}

/// What the audio tool backend can do in this process
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Capabilities {
    /// Backend name
    pub backend: String,
    /// Whether searches and downloads can run
    pub available: bool,
    /// Tool version, when available
    pub version: Option<String>,
    /// Whether a metadata client is configured
    pub metadata_configured: bool,
    /// Window size used for batches
    pub max_concurrent_downloads: usize,
}

/// A song as submitted by a caller; entries lacking a title or artist are
/// dropped before any work starts
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SongInput {
    /// Optional caller-supplied id (defaults to `song-{position}`)
    #[serde(default)]
    pub id: Option<String>,
    /// Track title
    #[serde(default)]
    pub title: Option<String>,
    /// Artist name(s)
    #[serde(default)]
    pub artist: Option<String>,
}

impl SongInput {
    /// Convenience constructor
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            artist: Some(artist.into()),
        }
    }

    /// Normalize into a descriptor; `None` when title or artist is blank.
    /// `position` is zero-based and only used for the default id.
    pub fn to_descriptor(&self, position: usize) -> Option<SongDescriptor> {
        let title = self.title.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let artist = self.artist.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let id = self
            .id
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("song-{}", position + 1));
        Some(SongDescriptor::new(id, title, artist))
    }
}

impl From<&SongDescriptor> for SongInput {
    fn from(descriptor: &SongDescriptor) -> Self {
        Self {
            id: Some(descriptor.id.clone()),
            title: Some(descriptor.title.clone()),
            artist: Some(descriptor.artist.clone()),
        }
    }
}

/// Batch download request
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct BatchRequest {
    /// Songs in the order they should be processed
    #[serde(default)]
    pub songs: Vec<SongInput>,
    /// Playlist name (defaults to "Unknown Playlist")
    #[serde(default)]
    pub collection_name: Option<String>,
    /// Override `download.create_archive` for this batch
    #[serde(default)]
    pub create_archive: Option<bool>,
}
