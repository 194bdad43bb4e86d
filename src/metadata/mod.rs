//! Metadata collaborator: reference string in, song descriptors out
//!
//! [`MetadataProvider`] is the seam the downloader talks to. The shipped
//! implementation is [`SpotifyClient`], which resolves public Spotify track
//! and playlist URLs through the Web API client-credentials flow.

mod spotify;

pub use spotify::SpotifyClient;

use crate::types::ExtractedMetadata;
use async_trait::async_trait;

/// Resolves a public reference (URL) into an ordered list of songs
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Resolve `reference`.
    ///
    /// # Errors
    ///
    /// `Error::Metadata` with one of `NotFound`, `InvalidFormat`,
    /// `Unauthenticated`, `RateLimited` or `Upstream`.
    async fn extract(&self, reference: &str) -> crate::Result<ExtractedMetadata>;

    /// Whether credentials are present
    fn is_configured(&self) -> bool;
}
