//! Mapping songs to audio sources and fetching the audio
//!
//! [`SourceResolver`] turns a [`SongDescriptor`](crate::types::SongDescriptor)
//! into a [`SourceLocator`](crate::types::SourceLocator) using a first-match
//! policy; [`AudioFetcher`] downloads the located source and verifies the
//! resulting file on disk.

mod fetcher;
mod resolver;

pub use fetcher::AudioFetcher;
pub use resolver::SourceResolver;
